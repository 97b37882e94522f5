use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::utils::Observable;

/// A message on screen; `id` tells repeated identical texts apart
#[derive(Clone, Debug, PartialEq)]
pub struct SnackMessage {
    pub id: u64,
    pub text: String,
}

struct SnackQueue {
    pending: RefCell<VecDeque<String>>,
    current: Observable<Option<SnackMessage>>,
    counter: Cell<u64>,
}

impl SnackQueue {
    fn push(&self, message: String) {
        log::info!("Snack: {}", message);
        self.pending.borrow_mut().push_back(message);
        if self.current.with(Option::is_none) {
            self.advance();
        }
    }

    fn advance(&self) {
        let next = self.pending.borrow_mut().pop_front().map(|text| {
            let id = self.counter.get() + 1;
            self.counter.set(id);
            SnackMessage { id, text }
        });
        self.current.set(next);
    }
}

/// Shared toast queue
///
/// Stores never talk to the snackbar component directly; they get a
/// [`Snack`] dispatcher at construction time and push messages through it.
pub struct SnackManager {
    queue: Rc<SnackQueue>,
}

impl Default for SnackManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SnackManager {
    pub fn new() -> Self {
        Self {
            queue: Rc::new(SnackQueue {
                pending: RefCell::new(VecDeque::new()),
                current: Observable::new(None),
                counter: Cell::new(0),
            }),
        }
    }

    /// Dispatcher handed to the other stores
    pub fn snack(&self) -> Snack {
        Snack {
            queue: self.queue.clone(),
        }
    }

    /// Message currently on screen
    pub fn current(&self) -> Observable<Option<SnackMessage>> {
        self.queue.current.clone()
    }

    /// Hide the current message and show the next queued one
    pub fn dismiss(&self) {
        self.queue.advance();
    }

    #[allow(dead_code)]
    pub fn has_next(&self) -> bool {
        !self.queue.pending.borrow().is_empty()
    }

    /// How many messages have been shown so far
    #[allow(dead_code)]
    pub fn counter(&self) -> u64 {
        self.queue.counter.get()
    }
}

/// Cloneable handle that queues a message on the page's snackbar
#[derive(Clone)]
pub struct Snack {
    queue: Rc<SnackQueue>,
}

impl Snack {
    pub fn call(&self, message: impl Into<String>) {
        self.queue.push(message.into());
    }
}

impl PartialEq for Snack {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.queue, &other.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current_text(manager: &SnackManager) -> Option<String> {
        manager.current().get().map(|m| m.text)
    }

    #[test]
    fn test_first_snack_shows_immediately() {
        let manager = SnackManager::new();
        manager.snack().call("Application created");

        assert_eq!(current_text(&manager).as_deref(), Some("Application created"));
        assert!(!manager.has_next());
        assert_eq!(manager.counter(), 1);
    }

    #[test]
    fn test_queue_preserves_order() {
        let manager = SnackManager::new();
        let snack = manager.snack();
        snack.call("one");
        snack.call("two");
        snack.call("three");

        assert_eq!(current_text(&manager).as_deref(), Some("one"));
        assert!(manager.has_next());

        manager.dismiss();
        assert_eq!(current_text(&manager).as_deref(), Some("two"));
        manager.dismiss();
        assert_eq!(current_text(&manager).as_deref(), Some("three"));
        manager.dismiss();
        assert_eq!(current_text(&manager), None);
        assert_eq!(manager.counter(), 3);
    }

    #[test]
    fn test_repeated_text_gets_new_id() {
        let manager = SnackManager::new();
        let snack = manager.snack();
        snack.call("Login failed");
        let first = manager.current().get().unwrap();

        snack.call("Login failed");
        manager.dismiss();
        let second = manager.current().get().unwrap();

        assert_eq!(first.text, second.text);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_dispatchers_share_one_queue() {
        let manager = SnackManager::new();
        let a = manager.snack();
        let b = a.clone();
        assert!(a == b);
        assert!(a == manager.snack());

        a.call("from a");
        b.call("from b");
        manager.dismiss();
        assert_eq!(current_text(&manager).as_deref(), Some("from b"));
    }
}
