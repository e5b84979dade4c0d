//! State observers and the broadcaster that fans notifications out to them.
//!
//! - [`StateObserver`] the user-facing callback trait;
//! - [`Broadcaster`] copy-on-write registry with panic-isolated delivery;
//! - [`LogObserver`] (feature `logging`) logs every state entry through `tracing`.

mod broadcaster;
#[cfg(feature = "logging")]
mod log;
mod observer;

pub use broadcaster::{Broadcaster, DeliveryFailure};
#[cfg(feature = "logging")]
pub use log::LogObserver;
pub use observer::StateObserver;
pub(crate) use observer::announce;
