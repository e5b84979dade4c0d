//! Zero-capacity handoff between submitters and the worker.
//!
//! See [`Rendezvous`] for the protocol.

mod rendezvous;

pub use rendezvous::{Message, Rendezvous};
