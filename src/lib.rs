//! # handoff
//!
//! **handoff** is a minimal single-worker request server built on tokio.
//!
//! A submitter hands one request at a time to a dedicated worker through a
//! zero-capacity rendezvous channel. The worker cycles through three states and
//! tells its observers about every state entry **before** doing that state's work.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   submitter #1 ──┐  submit_data(data, timeout) -> bool
//!   submitter #2 ──┼────────────────────────────────────┐
//!   submitter #N ──┘  request_shutdown(timeout) -> bool │
//!                                                       ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Server                                                           │
//! │  - Rendezvous (zero-buffer handoff, one message in flight)        │
//! │  - Broadcaster<dyn StateObserver> (copy-on-write registry)        │
//! │  - Bus (observer faults side channel)                             │
//! │  - WorkHandler (process / send, injected)                         │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//!                   worker task: Server::run(token)
//!                                │
//!          ┌─────────────────────┼──────────────────────┐
//!          ▼                     ▼                      ▼
//!      on_waiting()        on_processing()         on_sending()
//!      take()              handler.process(data)   handler.send()
//! ```
//!
//! ### Lifecycle
//! ```text
//! Idle ──► run(token)
//!
//! loop {
//!   ├─► Waiting:    notify ─► take(token)
//!   │                 ├─ Shutdown accepted   ─► exit Ok(())
//!   │                 ├─ token cancelled     ─► exit Ok(())
//!   │                 └─ Request(data)
//!   ├─► Processing: notify ─► process(data)  ─► Err ─► exit Err(Handler)
//!   └─► Sending:    notify ─► send()         ─► Err ─► exit Err(Handler)
//! }
//!
//! On exit: channel closed (submits return false at once), status = Terminated.
//! ```
//!
//! ## Features
//! | Area             | Description                                              | Key types / traits                      |
//! |------------------|----------------------------------------------------------|-----------------------------------------|
//! | **Server**       | Worker loop, submission API, lifecycle status.           | [`Server`], [`State`], [`Status`]       |
//! | **Handoff**      | Zero-capacity channel with timeouts and cancellation.    | [`Rendezvous`], [`Message`]             |
//! | **Observers**    | Synchronous state callbacks with panic isolation.        | [`StateObserver`], [`Broadcaster`]      |
//! | **Work**         | Pluggable processing/sending behavior.                   | [`WorkHandler`], [`HandlerFn`], [`DelayHandler`] |
//! | **Faults**       | Observer panics published on a broadcast side channel.   | [`ObserverFault`], [`Bus`]              |
//! | **Errors**       | Typed errors for the worker and handlers.                | [`ServerError`], [`HandlerError`]       |
//! | **Configuration**| Server and reference-handler settings.                   | [`ServerConfig`], [`DelayConfig`]       |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogObserver`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::{sync::Arc, time::Duration};
//! use tokio_util::sync::CancellationToken;
//! use handoff::{DelayConfig, DelayHandler, Server, StateObserver};
//!
//! struct Printer;
//!
//! impl StateObserver for Printer {
//!     fn on_processing(&self) { println!("processing"); }
//!     fn name(&self) -> &'static str { "printer" }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let handler = DelayHandler::from_config(DelayConfig::from_millis(10, 10));
//!     let server: Arc<Server<String, _>> = Arc::new(Server::new(handler));
//!     server.add_state_observer(Arc::new(Printer));
//!
//!     let token = CancellationToken::new();
//!     let worker = {
//!         let server = Arc::clone(&server);
//!         let token = token.clone();
//!         tokio::spawn(async move { server.run(token).await })
//!     };
//!
//!     // Accepted only while the worker is waiting.
//!     let accepted = server.submit_data("Request 0".into(), Duration::from_millis(100)).await;
//!     assert!(accepted);
//!
//!     token.cancel();
//!     worker.await??;
//!     Ok(())
//! }
//! ```
mod channel;
mod core;
mod error;
mod events;
mod handlers;
mod observers;

// ---- Public re-exports ----

pub use channel::{Message, Rendezvous};
pub use self::core::{DelayConfig, Server, ServerConfig, State, Status};
pub use error::{HandlerError, ServerError};
pub use events::{Bus, ObserverFault};
pub use handlers::{DelayHandler, HandlerFn, WorkHandler};
pub use observers::{Broadcaster, DeliveryFailure, StateObserver};

// Optional: expose a simple built-in logging observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogObserver;
