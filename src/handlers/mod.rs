//! # Work handlers.
//!
//! The server core never does real work itself; it drives a [`WorkHandler`]:
//! - [`WorkHandler`] - trait supplying `process(data)` and `send()`
//! - [`HandlerFn`] - closure-backed implementation
//! - [`DelayHandler`] - reference implementation that only sleeps

mod delay;
mod handler;
mod handler_fn;

pub use delay::DelayHandler;
pub use handler::WorkHandler;
pub use handler_fn::HandlerFn;
