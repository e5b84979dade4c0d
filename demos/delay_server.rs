//! # Example: delay_server
//!
//! A server driven by [`DelayHandler`] with the built-in [`LogObserver`].
//!
//! Demonstrates how to:
//! - Spawn the worker with a [`CancellationToken`].
//! - Submit requests with a short handoff timeout and see which are refused.
//! - Stop the worker through an accepted shutdown request.
//!
//! ## Flow
//! ```text
//! Server::run(token)
//!     ├─► [waiting]    submit "Request 0" ─► accepted
//!     ├─► [processing] submit "Request 1" ─► refused (busy)
//!     ├─► [sending]
//!     ├─► [waiting]    submit "Request 2" ─► accepted
//!     ├─► ...
//!     └─► [waiting]    request_shutdown  ─► accepted ─► exit
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example delay_server --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use handoff::{DelayConfig, DelayHandler, LogObserver, Server, ServerConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // 1. Server with a 10ms handoff timeout and a 50ms/50ms reference handler
    let handler = DelayHandler::from_config(DelayConfig::from_millis(50, 50));
    let server: Arc<Server<String, _>> = Arc::new(Server::with_config(
        handler,
        ServerConfig {
            submit_timeout: Duration::from_millis(10),
            ..ServerConfig::default()
        },
    ));
    server.add_state_observer(Arc::new(LogObserver));

    // 2. Spawn the worker
    let token = CancellationToken::new();
    let worker = {
        let server = Arc::clone(&server);
        let token = token.clone();
        tokio::spawn(async move { server.run(token).await })
    };

    // 3. Submit a request every 30ms; roughly every other one lands while busy
    for i in 0..6 {
        let accepted = server.submit(format!("Request {i}")).await;
        tracing::info!(request = i, accepted, "submitted");
        tokio::time::sleep(Duration::from_millis(30)).await;
    }

    // 4. Retry the shutdown request until the worker is back in Waiting
    while !server.request_shutdown(Duration::from_millis(100)).await {}
    worker.await??;

    tracing::info!(status = ?server.status(), "worker finished");
    Ok(())
}
