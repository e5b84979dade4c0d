//! Observer faults and the broadcast bus that carries them.
//!
//! A panicking observer never stops the worker; the failure is reported here instead.
//!
//! ## Contents
//! - [`ObserverFault`] what failed, in which state, with which panic message
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publisher**: the worker loop, right after a notification round.
//! - **Consumers**: anyone holding a receiver from [`Server::subscribe_faults`](crate::Server::subscribe_faults).

mod bus;
mod fault;

pub use bus::Bus;
pub use fault::ObserverFault;
