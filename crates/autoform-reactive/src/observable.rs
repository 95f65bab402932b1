#![forbid(unsafe_code)]

//! Shared, version-tracked value cells with change notification.
//!
//! # Design
//!
//! [`Observable<T>`] keeps its value, a version counter and the subscriber
//! list in one `Rc<RefCell<..>>`. Cloning an `Observable` yields another
//! handle to the same cell. Subscribers are held as `Weak` callbacks; the
//! strong side lives in the [`Subscription`] returned by
//! [`subscribe()`](Observable::subscribe), so dropping the guard is enough to
//! detach. Dead entries are pruned on the next notification.
//!
//! # Re-entrancy
//!
//! No borrow is held while callbacks run. A callback may read the observable,
//! write it again, or subscribe new callbacks. A nested write notifies
//! immediately and supersedes the outer write: callbacks that have not run
//! yet for the outer write are skipped, so the last value every subscriber
//! sees is the current one.
//!
//! # Failure Modes
//!
//! - **Callback panics**: the value and version have already been updated;
//!   the remaining callbacks for that write are skipped.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = dyn Fn(&T);

struct ObservableInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<Weak<Callback<T>>>,
}

/// A shared value cell that notifies subscribers when its value changes.
///
/// # Invariants
///
/// 1. `version` increments exactly once per write that changes the value.
/// 2. Subscribers are notified in registration order.
/// 3. Writing a value equal to the current one is a no-op.
/// 4. No subscriber receives a value older than one it has already seen.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Default + Clone + PartialEq + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create a new observable holding `value` at version 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone out the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference.
    ///
    /// # Panics
    ///
    /// Panics if `f` writes to this observable.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value and notify subscribers.
    ///
    /// Returns `false` (and notifies nobody) when `value` equals the current
    /// value.
    pub fn set(&self, value: T) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return false;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
        true
    }

    /// Mutate the value in place. Subscribers are notified only if the
    /// result differs from the previous value.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let mut next = self.get();
        f(&mut next);
        self.set(next)
    }

    /// Number of writes that changed the value.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Register `callback` to run after every change.
    ///
    /// The callback stays registered until the returned [`Subscription`] is
    /// dropped or [`cancel`](Subscription::cancel)led.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: Rc<Callback<T>> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription {
            guard: Some(Box::new(strong)),
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Whether both handles point at the same cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn notify(&self) {
        let (value, version, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|weak| weak.strong_count() > 0);
            let callbacks: Vec<Rc<Callback<T>>> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            (inner.value.clone(), inner.version, callbacks)
        };
        for callback in callbacks {
            // A nested write already delivered a newer value to everyone.
            if self.inner.borrow().version != version {
                break;
            }
            callback(&value);
        }
    }
}

/// RAII guard for an [`Observable`] subscription.
///
/// Dropping the guard removes the callback before the next notification.
pub struct Subscription {
    guard: Option<Box<dyn Any>>,
}

impl Subscription {
    /// Detach the callback now. Equivalent to dropping the guard.
    pub fn cancel(mut self) {
        self.guard.take();
    }

    /// Whether the callback is still attached through this guard.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.guard.is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn set_bumps_version_once_per_change() {
        let obs = Observable::new(1);
        assert_eq!(obs.version(), 0);
        assert!(obs.set(2));
        assert_eq!(obs.version(), 1);
        assert!(!obs.set(2));
        assert_eq!(obs.version(), 1);
        assert_eq!(obs.get(), 2);
    }

    #[test]
    fn subscribers_run_in_registration_order() {
        let obs = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));
        let l1 = Rc::clone(&log);
        let l2 = Rc::clone(&log);
        let _a = obs.subscribe(move |v| l1.borrow_mut().push(("a", *v)));
        let _b = obs.subscribe(move |v| l2.borrow_mut().push(("b", *v)));

        obs.set(7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn equal_write_does_not_notify() {
        let obs = Observable::new("x".to_string());
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = obs.subscribe(move |_| h.set(h.get() + 1));

        obs.set("x".to_string());
        assert_eq!(hits.get(), 0);
        obs.set("y".to_string());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn dropping_subscription_detaches() {
        let obs = Observable::new(0);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = obs.subscribe(move |_| h.set(h.get() + 1));
        assert_eq!(obs.subscriber_count(), 1);

        obs.set(1);
        drop(sub);
        assert_eq!(obs.subscriber_count(), 0);
        obs.set(2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn cancel_detaches() {
        let obs = Observable::new(0);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = obs.subscribe(move |_| h.set(h.get() + 1));
        assert!(sub.is_active());
        sub.cancel();
        obs.set(5);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn clones_share_the_cell() {
        let a = Observable::new(3);
        let b = a.clone();
        b.set(4);
        assert_eq!(a.get(), 4);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&Observable::new(4)));
    }

    #[test]
    fn callback_may_write_back() {
        let obs = Observable::new(0);
        let target = obs.clone();
        let _sub = obs.subscribe(move |v| {
            if *v == 1 {
                target.set(2);
            }
        });
        obs.set(1);
        assert_eq!(obs.get(), 2);
        assert_eq!(obs.version(), 2);
    }

    #[test]
    fn nested_write_supersedes_outer_notification() {
        let obs = Observable::new(String::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let target = obs.clone();
        let _upper = obs.subscribe(move |v: &String| {
            target.set(v.to_uppercase());
        });
        let sink = Rc::clone(&log);
        let _later = obs.subscribe(move |v: &String| sink.borrow_mut().push(v.clone()));

        obs.set("abc".to_string());
        assert_eq!(obs.get(), "ABC");
        assert_eq!(*log.borrow(), vec!["ABC".to_string()]);
        assert_eq!(obs.version(), 2);
    }

    #[test]
    fn update_in_place() {
        let obs = Observable::new(vec![1, 2]);
        assert!(obs.update(|v| v.push(3)));
        assert_eq!(obs.get(), vec![1, 2, 3]);
        assert!(!obs.update(|_| {}));
    }

    #[test]
    fn debug_format() {
        let obs = Observable::new(42);
        let dbg = format!("{obs:?}");
        assert!(dbg.contains("Observable"));
        assert!(dbg.contains("42"));
    }
}
