use dioxus::prelude::*;
use std::rc::Rc;

use crate::utils::Observable;

/// Mirror a store observable into a signal so components re-render on change
///
/// The subscription is tied to the component: it is created on first render
/// and dropped on unmount. The observable passed on later renders is ignored.
///
/// # Example
/// ```
/// let stores = use_stores();
/// let logged_in = use_observable(&stores.current_user.logged_in);
///
/// rsx! { if logged_in() { MessageFeed {} } else { LoginForm {} } }
/// ```
pub fn use_observable<T>(observable: &Observable<T>) -> Signal<T>
where
    T: Clone + PartialEq + 'static,
{
    let signal = use_signal(|| observable.get());

    use_hook(|| {
        let subscription = observable.subscribe(move |value| {
            let mut signal = signal;
            signal.set(value.clone());
        });
        Rc::new(subscription)
    });

    signal
}
