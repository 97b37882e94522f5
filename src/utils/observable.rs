/// Observable values shared between stores and the UI
///
/// An `Observable<T>` is a cheap handle (clone = same value) to a piece of
/// store state plus an ordered list of subscribers. Mutations notify
/// subscribers synchronously, in the order they subscribed, before the
/// mutating call returns.
///
/// # Example
/// ```
/// let logged_in = Observable::new(false);
/// let sub = logged_in.subscribe(|value| log::info!("logged in: {}", value));
///
/// logged_in.set(true);  // subscriber runs here
/// logged_in.set(true);  // unchanged, nobody is notified
/// drop(sub);            // unsubscribes
/// ```
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    value: RefCell<T>,
    subscribers: RefCell<Vec<(u64, Callback<T>)>>,
    next_id: Cell<u64>,
    /// Bumped on every mutation; a delivery stops once a newer one started
    version: Cell<u64>,
}

pub struct Observable<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + Default + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> std::fmt::Debug for Observable<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.inner.value.borrow())
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

impl<T: Clone + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(value),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                version: Cell::new(0),
            }),
        }
    }

    /// Read the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Mutate the value in place and notify every subscriber
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.inner.value.borrow_mut());
        self.bump();
        self.notify();
    }

    /// Register a callback for every future change
    ///
    /// The callback does not run for the current value.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(callback)));

        let weak: Weak<Inner<T>> = Rc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
                }
            })),
        }
    }

    #[allow(dead_code)]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    fn bump(&self) {
        self.inner.version.set(self.inner.version.get() + 1);
    }

    fn notify(&self) {
        // Snapshot so callbacks may subscribe, unsubscribe or set re-entrantly
        let callbacks: Vec<Callback<T>> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();

        let version = self.inner.version.get();
        let value = self.get();
        for callback in callbacks {
            // A nested mutation already delivered the newer value to everyone
            if self.inner.version.get() != version {
                break;
            }
            callback(&value);
        }
    }

    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Replace the value, notifying subscribers only when it changed
    ///
    /// Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value;
        }
        self.bump();
        self.notify();
        true
    }
}

/// Keeps a subscriber registered until dropped
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Keep the subscriber for as long as the observable lives
    pub fn detach(mut self) {
        self.cancel.take();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
