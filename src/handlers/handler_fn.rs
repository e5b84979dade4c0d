//! # Function-backed handler (`HandlerFn`)
//!
//! [`HandlerFn`] wraps two closures, one per busy state, producing a fresh future per call.
//! If the closures need shared state, capture an `Arc<...>` explicitly.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use handoff::{HandlerError, HandlerFn, Server};
//!
//! let handler = HandlerFn::new(
//!     |data: u32, _ctx: CancellationToken| async move {
//!         println!("processing {data}");
//!         Ok::<_, HandlerError>(())
//!     },
//!     |_ctx: CancellationToken| async { Ok::<_, HandlerError>(()) },
//! );
//! let server: Server<u32, _> = Server::new(handler);
//! # let _ = server;
//! ```

use std::future::Future;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::handlers::handler::WorkHandler;

/// Closure-backed [`WorkHandler`].
#[derive(Debug, Clone)]
pub struct HandlerFn<P, S> {
    process: P,
    send: S,
}

impl<P, S> HandlerFn<P, S> {
    /// Creates a handler from a `process` closure and a `send` closure.
    pub fn new(process: P, send: S) -> Self {
        Self { process, send }
    }
}

#[async_trait]
impl<D, P, PFut, S, SFut> WorkHandler<D> for HandlerFn<P, S>
where
    D: Send + 'static,
    P: Fn(D, CancellationToken) -> PFut + Send + Sync + 'static, // Fn, not FnMut
    PFut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    S: Fn(CancellationToken) -> SFut + Send + Sync + 'static,
    SFut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn process(&self, data: D, ctx: CancellationToken) -> Result<(), HandlerError> {
        (self.process)(data, ctx).await
    }

    async fn send(&self, ctx: CancellationToken) -> Result<(), HandlerError> {
        (self.send)(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn closures_receive_payload_and_errors_pass_through() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let handler = {
            let seen = Arc::clone(&seen);
            HandlerFn::new(
                move |data: &'static str, _ctx: CancellationToken| {
                    let seen = Arc::clone(&seen);
                    async move {
                        seen.lock().unwrap().push(data);
                        Ok::<_, HandlerError>(())
                    }
                },
                |_ctx: CancellationToken| async {
                    Err::<(), _>(HandlerError::fail("no route"))
                },
            )
        };

        WorkHandler::<&'static str>::process(&handler, "Request 0", CancellationToken::new())
            .await
            .unwrap();
        let err = WorkHandler::<&'static str>::send(&handler, CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(*seen.lock().unwrap(), vec!["Request 0"]);
        assert_eq!(err.as_label(), "handler_failed");
    }
}
