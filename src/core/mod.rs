//! Server core: worker loop, states and configuration.
//!
//! The public API of this module is [`Server`] plus its vocabulary types.
//!
//! Internal modules:
//! - `server`: the worker loop, submission API and observer wiring;
//! - `state`: [`State`] (what observers hear about) and [`Status`] (lifecycle);
//! - `config`: [`ServerConfig`] and [`DelayConfig`];
//! - `shutdown`: OS termination signals for `run_until_signal`.

mod config;
mod server;
mod shutdown;
mod state;

pub use config::{DelayConfig, ServerConfig};
pub use server::Server;
pub use state::{State, Status};
