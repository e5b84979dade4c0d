//! # Broadcaster: synchronous fan-out over a copy-on-write registry
//!
//! [`Broadcaster`] keeps its observers in an [`ArcSwap`]ed vector:
//! - `add`/`remove` build a new vector and swap it in (read-copy-update);
//! - `notify` loads a snapshot and iterates it without holding any lock.
//!
//! ## Diagram
//! ```text
//!  add / remove ──► rcu(|v| v' ) ──► ArcSwap<Vec<Arc<O>>>
//!                                          │ load_full()
//!  notify(deliver) ◄──── snapshot ─────────┘
//!        ├─► catch_unwind(deliver(o1))
//!        ├─► catch_unwind(deliver(o2))   panic ─► DeliveryFailure
//!        └─► catch_unwind(deliver(oN))
//! ```
//!
//! ## What it guarantees
//! - Registry changes during `notify` never corrupt it; they apply from the next call.
//! - A panicking observer does not prevent delivery to the rest (isolate-and-continue).
//!
//! ## What it does **not** guarantee
//! - No deduplication: adding the same observer twice doubles its deliveries.
//! - No ordering between observers beyond "stable within one call".
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if an observer panics while holding a lock.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use arc_swap::ArcSwap;

/// An observer that panicked during [`Broadcaster::notify`].
pub struct DeliveryFailure<O: ?Sized> {
    /// The observer that panicked.
    pub observer: Arc<O>,
    /// Panic payload rendered as text.
    pub message: String,
}

impl<O: ?Sized> std::fmt::Debug for DeliveryFailure<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryFailure")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Thread-safe registry of observers with synchronous fan-out.
///
/// ## Example
/// ```rust
/// use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
/// use handoff::Broadcaster;
///
/// let hits = Arc::new(AtomicUsize::new(0));
/// let bc: Broadcaster<AtomicUsize> = Broadcaster::new();
/// bc.add(Arc::clone(&hits));
///
/// let failures = bc.notify(|h| { h.fetch_add(1, Ordering::SeqCst); });
/// assert!(failures.is_empty());
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
///
/// assert!(bc.remove(&hits));
/// assert!(!bc.remove(&hits)); // absent: no-op
/// ```
pub struct Broadcaster<O: ?Sized> {
    observers: ArcSwap<Vec<Arc<O>>>,
}

impl<O: ?Sized> Broadcaster<O> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            observers: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Registers `observer`. Registering it twice yields two deliveries per event.
    pub fn add(&self, observer: Arc<O>) {
        self.observers.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(Arc::clone(&observer));
            next
        });
    }

    /// Unregisters one occurrence of `observer` (compared by pointer).
    ///
    /// Returns `false` if it was not registered.
    pub fn remove(&self, observer: &Arc<O>) -> bool {
        let mut removed = false;
        self.observers.rcu(|current| {
            let mut next = Vec::clone(current);
            removed = match next.iter().position(|o| same_observer(o, observer)) {
                Some(idx) => {
                    next.remove(idx);
                    true
                }
                None => false,
            };
            next
        });
        removed
    }

    /// Delivers one event to every observer registered when the call starts.
    ///
    /// Panics raised by `deliver` are caught per observer; delivery continues and the
    /// failures are returned to the caller.
    pub fn notify<F>(&self, mut deliver: F) -> Vec<DeliveryFailure<O>>
    where
        F: FnMut(&O),
    {
        let snapshot = self.observers.load_full();
        let mut failures = Vec::new();

        for observer in snapshot.iter() {
            let target: &O = observer;
            if let Err(panic_err) = panic::catch_unwind(AssertUnwindSafe(|| deliver(target))) {
                failures.push(DeliveryFailure {
                    observer: Arc::clone(observer),
                    message: panic_message(&*panic_err),
                });
            }
        }
        failures
    }

    /// Number of registrations (duplicates included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.load().len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.load().is_empty()
    }
}

impl<O: ?Sized> Default for Broadcaster<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: ?Sized> std::fmt::Debug for Broadcaster<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("observers", &self.len())
            .finish()
    }
}

fn same_observer<O: ?Sized>(a: &Arc<O>, b: &Arc<O>) -> bool {
    // data pointers only; vtables of the same type may differ between codegen units
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Listener: Send + Sync {
        fn on_event(&self);
    }

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl Counter {
        fn hits(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl Listener for Counter {
        fn on_event(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Panicker;

    impl Listener for Panicker {
        fn on_event(&self) {
            panic!("listener exploded");
        }
    }

    fn pair() -> (Broadcaster<dyn Listener>, Arc<Counter>, Arc<Counter>) {
        let bc: Broadcaster<dyn Listener> = Broadcaster::new();
        let first = Arc::new(Counter::default());
        let second = Arc::new(Counter::default());
        bc.add(first.clone());
        bc.add(second.clone());
        (bc, first, second)
    }

    #[test]
    fn added_listeners_receive_notifications() {
        let (bc, first, second) = pair();

        bc.notify(|l| l.on_event());

        assert_eq!(first.hits(), 1);
        assert_eq!(second.hits(), 1);
    }

    #[test]
    fn removed_listeners_dont_receive_notifications() {
        let (bc, first, second) = pair();
        let first_dyn: Arc<dyn Listener> = first.clone();

        assert!(bc.remove(&first_dyn));
        bc.notify(|l| l.on_event());

        assert_eq!(first.hits(), 0);
        assert_eq!(second.hits(), 1);
        assert_eq!(bc.len(), 1);
    }

    #[test]
    fn duplicate_registration_doubles_delivery() {
        let bc: Broadcaster<dyn Listener> = Broadcaster::new();
        let counter = Arc::new(Counter::default());
        let handle: Arc<dyn Listener> = counter.clone();
        bc.add(handle.clone());
        bc.add(handle.clone());

        bc.notify(|l| l.on_event());
        assert_eq!(counter.hits(), 2);

        // one remove drops one registration
        assert!(bc.remove(&handle));
        bc.notify(|l| l.on_event());
        assert_eq!(counter.hits(), 3);
    }

    #[test]
    fn panicking_listener_does_not_block_others() {
        let bc: Broadcaster<dyn Listener> = Broadcaster::new();
        let before = Arc::new(Counter::default());
        let after = Arc::new(Counter::default());
        bc.add(before.clone());
        bc.add(Arc::new(Panicker));
        bc.add(after.clone());

        let failures = bc.notify(|l| l.on_event());

        assert_eq!(before.hits(), 1);
        assert_eq!(after.hits(), 1);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].message, "listener exploded");
    }

    #[test]
    fn registry_changes_during_notify_apply_to_next_call() {
        let bc: Arc<Broadcaster<dyn Listener>> = Arc::new(Broadcaster::new());
        let late = Arc::new(Counter::default());
        let seen = Mutex::new(0usize);

        bc.add(Arc::new(Counter::default()));
        bc.add(Arc::new(Counter::default()));

        let late_dyn: Arc<dyn Listener> = late.clone();
        bc.notify(|l| {
            l.on_event();
            *seen.lock().unwrap() += 1;
            bc.add(late_dyn.clone());
        });

        assert_eq!(*seen.lock().unwrap(), 2);
        assert_eq!(late.hits(), 0);
        assert_eq!(bc.len(), 4);

        bc.notify(|l| l.on_event());
        assert_eq!(late.hits(), 2);
    }

    #[test]
    fn concurrent_mutation_and_delivery() {
        let bc: Arc<Broadcaster<dyn Listener>> = Arc::new(Broadcaster::new());
        let stable = Arc::new(Counter::default());
        bc.add(stable.clone());

        let churn = {
            let bc = Arc::clone(&bc);
            std::thread::spawn(move || {
                for _ in 0..500 {
                    let transient: Arc<dyn Listener> = Arc::new(Counter::default());
                    bc.add(transient.clone());
                    assert!(bc.remove(&transient));
                }
            })
        };

        for _ in 0..500 {
            assert!(bc.notify(|l| l.on_event()).is_empty());
        }
        churn.join().unwrap();

        assert_eq!(stable.hits(), 500);
        assert_eq!(bc.len(), 1);
    }
}
