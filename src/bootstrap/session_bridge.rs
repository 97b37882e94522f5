//! Reacts to login/logout by opening or closing the message stream
//!
//! Every change of `logged_in` runs one reaction: `listen()` when the session
//! became valid, `close()` when it ended, and then a refresh of the
//! application list. The connection call always happens before the refresh.
//! Nothing assumes monotonic transitions; a fast logout/login pair produces two
//! full reactions.

use std::rc::Rc;

use crate::utils::{Observable, Subscription};

/// A realtime connection that can be started and stopped any number of times
pub trait RealtimeConnection {
    fn listen(&self);
    fn close(&self);
}

/// A store that can reload its data in the background
pub trait Refresh {
    fn refresh(&self);
}

/// Wire the session flag to the realtime connection and the app list
pub fn bind(
    logged_in: &Observable<bool>,
    realtime: Rc<dyn RealtimeConnection>,
    app_store: Rc<dyn Refresh>,
) -> Subscription {
    logged_in.subscribe(move |logged_in| {
        if *logged_in {
            log::info!("Session started, opening message stream");
            realtime.listen();
        } else {
            log::info!("Session ended, closing message stream");
            realtime.close();
        }
        app_store.refresh();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<&'static str>>,
    }

    impl RealtimeConnection for Recorder {
        fn listen(&self) {
            self.calls.borrow_mut().push("listen");
        }

        fn close(&self) {
            self.calls.borrow_mut().push("close");
        }
    }

    impl Refresh for Recorder {
        fn refresh(&self) {
            self.calls.borrow_mut().push("refresh");
        }
    }

    #[test]
    fn test_toggle_opens_then_closes() {
        let logged_in = Observable::new(false);
        let recorder = Rc::new(Recorder::default());
        let _bridge = bind(&logged_in, recorder.clone(), recorder.clone());

        logged_in.set(true);
        logged_in.set(false);

        assert_eq!(
            *recorder.calls.borrow(),
            vec!["listen", "refresh", "close", "refresh"]
        );
    }

    #[test]
    fn test_no_reaction_without_change() {
        let logged_in = Observable::new(false);
        let recorder = Rc::new(Recorder::default());
        let _bridge = bind(&logged_in, recorder.clone(), recorder.clone());

        logged_in.set(false);
        assert!(recorder.calls.borrow().is_empty());
    }

    #[test]
    fn test_rapid_relogin_reacts_every_time() {
        let logged_in = Observable::new(true);
        let recorder = Rc::new(Recorder::default());
        let _bridge = bind(&logged_in, recorder.clone(), recorder.clone());

        logged_in.set(false);
        logged_in.set(true);
        logged_in.set(false);
        logged_in.set(true);

        assert_eq!(
            *recorder.calls.borrow(),
            vec![
                "close", "refresh", "listen", "refresh", "close", "refresh", "listen", "refresh"
            ]
        );
    }

    #[test]
    fn test_dropping_bridge_stops_reactions() {
        let logged_in = Observable::new(false);
        let recorder = Rc::new(Recorder::default());
        let bridge = bind(&logged_in, recorder.clone(), recorder.clone());
        drop(bridge);

        logged_in.set(true);
        assert!(recorder.calls.borrow().is_empty());
    }
}
