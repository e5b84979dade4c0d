//! # Reference handler that only sleeps.
//!
//! [`DelayHandler`] stands in for real work: `process` sleeps for
//! [`DelayConfig::processing`], `send` sleeps for [`DelayConfig::sending`].
//! The payload is discarded.
//!
//! The full delay is always honored, even if the worker is cancelled meanwhile;
//! cancellation takes effect once the worker is back in Waiting.

use async_trait::async_trait;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::DelayConfig;
use crate::error::HandlerError;
use crate::handlers::handler::WorkHandler;

/// Handler that spends fixed durations in Processing and Sending.
///
/// ## Example
/// ```rust
/// use handoff::{DelayConfig, DelayHandler, Server};
///
/// let handler = DelayHandler::from_config(DelayConfig::from_millis(50, 50));
/// let server: Server<String, _> = Server::new(handler);
/// # let _ = server;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DelayHandler {
    delays: DelayConfig,
}

impl DelayHandler {
    /// Creates a handler from explicit delays.
    pub fn from_config(delays: DelayConfig) -> Self {
        Self { delays }
    }

    /// Configured delays.
    pub fn delays(&self) -> DelayConfig {
        self.delays
    }
}

#[async_trait]
impl<D: Send + 'static> WorkHandler<D> for DelayHandler {
    async fn process(&self, _data: D, _ctx: CancellationToken) -> Result<(), HandlerError> {
        debug!(delay = ?self.delays.processing, "processing request");
        time::sleep(self.delays.processing).await;
        Ok(())
    }

    async fn send(&self, _ctx: CancellationToken) -> Result<(), HandlerError> {
        debug!(delay = ?self.delays.sending, "sending result");
        time::sleep(self.delays.sending).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn sleeps_full_delay_even_when_cancelled() {
        let handler = DelayHandler::from_config(DelayConfig::from_millis(30, 20));
        let ctx = CancellationToken::new();
        ctx.cancel();

        let started = Instant::now();
        WorkHandler::<u8>::process(&handler, 7, ctx.clone()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));

        let started = Instant::now();
        WorkHandler::<u8>::send(&handler, ctx).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
