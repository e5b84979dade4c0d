//! # StateObserver: user-facing state callbacks
//!
//! The [`StateObserver`] trait is the **extension point** for watching a server.
//! Each callback runs synchronously on the worker task, right before the work of the
//! state it announces:
//!
//! ```text
//! on_waiting()    ─► take()              (blocks until a request or shutdown)
//! on_processing() ─► handler.process(data)
//! on_sending()    ─► handler.send()
//! ```
//!
//! ## Rules
//! - Callbacks delay the worker; keep them short and non-blocking.
//! - A panic is caught, reported as an [`ObserverFault`](crate::ObserverFault) and does not
//!   reach other observers or the worker.
//!
//! # Example: counting cycles
//! ```rust
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use handoff::StateObserver;
//!
//! #[derive(Default)]
//! struct Cycles(AtomicU64);
//!
//! impl StateObserver for Cycles {
//!     fn on_sending(&self) {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!     }
//!     fn name(&self) -> &'static str { "cycles" }
//! }
//!
//! let cycles = Cycles::default();
//! cycles.on_sending();
//! cycles.on_waiting(); // default: no-op
//! assert_eq!(cycles.0.load(Ordering::Relaxed), 1);
//! ```

use crate::core::State;

/// Receives a notification on every state entry of a server's worker.
///
/// All callbacks default to no-ops, so implementors override only what they need.
pub trait StateObserver: Send + Sync + 'static {
    /// The worker is about to wait for the next request.
    fn on_waiting(&self) {}

    /// The worker is about to process an accepted request.
    fn on_processing(&self) {}

    /// The worker is about to send the result.
    fn on_sending(&self) {}

    /// Returns the observer name used in fault reports.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Invokes the callback matching `state`.
pub(crate) fn announce(observer: &dyn StateObserver, state: State) {
    match state {
        State::Waiting => observer.on_waiting(),
        State::Processing => observer.on_processing(),
        State::Sending => observer.on_sending(),
    }
}
