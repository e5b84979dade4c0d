//! # Work handler abstraction.
//!
//! A [`WorkHandler`] supplies the work of the two busy states. The server calls
//! `process` with the accepted request, then `send`, each after the corresponding
//! observer notification. Both receive a [`CancellationToken`] derived from the
//! worker's token; the server never preempts them, so a handler that must stop
//! promptly on shutdown checks the token itself.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;

/// # Pluggable processing and sending behavior.
///
/// Errors are fail-fast: the first `Err` ends the worker loop with
/// [`ServerError::Handler`](crate::ServerError::Handler). A handler that wants to keep
/// serving after a failure recovers internally and returns `Ok(())`.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use handoff::{HandlerError, WorkHandler};
///
/// struct Echo;
///
/// #[async_trait]
/// impl WorkHandler<String> for Echo {
///     async fn process(&self, data: String, ctx: CancellationToken) -> Result<(), HandlerError> {
///         if ctx.is_cancelled() {
///             return Err(HandlerError::Canceled);
///         }
///         println!("got {data}");
///         Ok(())
///     }
///
///     async fn send(&self, _ctx: CancellationToken) -> Result<(), HandlerError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait WorkHandler<D: Send + 'static>: Send + Sync + 'static {
    /// Handles one accepted request (the work of the Processing state).
    async fn process(&self, data: D, ctx: CancellationToken) -> Result<(), HandlerError>;

    /// Sends the result of the last request (the work of the Sending state).
    async fn send(&self, ctx: CancellationToken) -> Result<(), HandlerError>;
}

#[async_trait]
impl<D, H> WorkHandler<D> for Box<H>
where
    D: Send + 'static,
    H: WorkHandler<D> + ?Sized,
{
    async fn process(&self, data: D, ctx: CancellationToken) -> Result<(), HandlerError> {
        (**self).process(data, ctx).await
    }

    async fn send(&self, ctx: CancellationToken) -> Result<(), HandlerError> {
        (**self).send(ctx).await
    }
}

#[async_trait]
impl<D, H> WorkHandler<D> for Arc<H>
where
    D: Send + 'static,
    H: WorkHandler<D> + ?Sized,
{
    async fn process(&self, data: D, ctx: CancellationToken) -> Result<(), HandlerError> {
        (**self).process(data, ctx).await
    }

    async fn send(&self, ctx: CancellationToken) -> Result<(), HandlerError> {
        (**self).send(ctx).await
    }
}
