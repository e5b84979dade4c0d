//! # Server: the three-state worker loop.
//!
//! The [`Server`] owns the rendezvous channel, the observer broadcaster, the fault
//! bus and an injected [`WorkHandler`]. Exactly one worker runs [`Server::run`];
//! any number of tasks may submit concurrently.
//!
//! ## Worker loop
//! ```text
//! run(token)
//!   loop {
//!     ├─► enter Waiting    : notify on_waiting    ─► channel.take(token)
//!     │        ├─ Shutdown / token cancelled      ─► exit Ok(())
//!     │        └─ Request(data)
//!     ├─► enter Processing : notify on_processing ─► handler.process(data, ctx)
//!     ├─► enter Sending    : notify on_sending    ─► handler.send(ctx)
//!     └─► (handler Err ─► exit Err(ServerError::Handler))
//!   }
//!   on exit: channel closed, status = Terminated
//! ```
//!
//! ## Rules
//! - The notification of a state always completes before the state's work starts.
//! - The channel is only read in Waiting, so submits during Processing/Sending time out.
//! - A request accepted in Waiting is the payload of the very next `process` call.
//! - Observer panics are isolated and published on the fault bus; the loop goes on.
//! - Handler errors are fail-fast.
//! - A server runs once; it cannot be restarted after termination.
//! - Termination (channel closed, status `Terminated`) happens however `run` ends:
//!   normal return, handler error, handler panic or the `run` future being dropped.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::select;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::channel::{Message, Rendezvous};
use crate::core::config::ServerConfig;
use crate::core::shutdown::ShutdownSignal;
use crate::core::state::{State, Status, StatusCell};
use crate::error::ServerError;
use crate::events::{Bus, ObserverFault};
use crate::handlers::WorkHandler;
use crate::observers::{Broadcaster, StateObserver, announce};

/// Single-worker request server.
///
/// ## Example
/// ```rust
/// use std::{sync::Arc, time::Duration};
/// use tokio_util::sync::CancellationToken;
/// use handoff::{DelayConfig, DelayHandler, Server, Status};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), handoff::ServerError> {
/// let server = Arc::new(Server::<&'static str, _>::new(
///     DelayHandler::from_config(DelayConfig::from_millis(5, 5)),
/// ));
///
/// let worker = {
///     let server = Arc::clone(&server);
///     tokio::spawn(async move { server.run(CancellationToken::new()).await })
/// };
///
/// assert!(server.submit_data("Request 0", Duration::from_secs(1)).await);
/// while !server.request_shutdown(Duration::from_millis(50)).await {}
///
/// worker.await.expect("worker task")?;
/// assert_eq!(server.status(), Status::Terminated);
/// assert!(!server.submit_data("too late", Duration::from_secs(1)).await);
/// # Ok(())
/// # }
/// ```
pub struct Server<D, H> {
    channel: Rendezvous<D>,
    observers: Broadcaster<dyn StateObserver>,
    handler: H,
    faults: Bus,
    status: StatusCell,
    started: AtomicBool,
    config: ServerConfig,
}

impl<D, H> Server<D, H>
where
    D: Send + 'static,
    H: WorkHandler<D>,
{
    /// Creates a server with [`ServerConfig::default`].
    #[must_use]
    pub fn new(handler: H) -> Self {
        Self::with_config(handler, ServerConfig::default())
    }

    /// Creates a server with an explicit configuration.
    #[must_use]
    pub fn with_config(handler: H, config: ServerConfig) -> Self {
        Self {
            channel: Rendezvous::new(),
            observers: Broadcaster::new(),
            handler,
            faults: Bus::new(config.fault_capacity_clamped()),
            status: StatusCell::new(),
            started: AtomicBool::new(false),
            config,
        }
    }

    /// Runs the worker loop until a shutdown request is accepted, `token` is
    /// cancelled while waiting, or the handler fails.
    ///
    /// Meant to be spawned on its own task. Cancellation is observed in Waiting only;
    /// handlers get a child token and decide themselves whether to stop early.
    ///
    /// ### Errors
    /// - [`ServerError::AlreadyStarted`] if this server has been run before.
    /// - [`ServerError::Handler`] if `process` or `send` failed.
    pub async fn run(&self, token: CancellationToken) -> Result<(), ServerError> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(ServerError::AlreadyStarted);
        }
        let _teardown = Teardown {
            channel: &self.channel,
            status: &self.status,
        };
        debug!("worker started");

        let res = self.serve(&token).await;
        match &res {
            Ok(()) => debug!("worker terminated"),
            Err(err) => warn!(label = err.as_label(), error = %err, "worker terminated"),
        }
        res
    }

    /// Runs the worker loop until `stop` completes (or one of the regular exit
    /// conditions of [`run`](Self::run) occurs).
    ///
    /// When `stop` fires, the worker finishes its current cycle and stops in Waiting.
    pub async fn run_until<F: Future>(&self, stop: F) -> Result<(), ServerError> {
        let token = CancellationToken::new();
        let worker = self.run(token.clone());
        tokio::pin!(worker);

        select! {
            res = &mut worker => res,
            _ = stop => {
                token.cancel();
                worker.await
            }
        }
    }

    /// [`run_until`](Self::run_until) a termination signal (SIGINT, SIGTERM or
    /// SIGQUIT on Unix; Ctrl-C on Windows) reaches the process.
    ///
    /// The signal listeners are registered before the worker starts.
    ///
    /// ### Errors
    /// - [`ServerError::Signal`] if the listeners cannot be registered; the worker
    ///   is not started in that case.
    /// - Any error of [`run`](Self::run).
    pub async fn run_until_signal(&self) -> Result<(), ServerError> {
        let mut signal = ShutdownSignal::listen()?;
        self.run_until(async move {
            signal.recv().await;
            debug!("shutdown signal received");
        })
        .await
    }

    /// Hands `data` to the worker if it is waiting (or starts waiting) within `timeout`.
    ///
    /// Returns `false` when the worker is busy, not started or terminated; the data
    /// is dropped in that case and nothing is queued.
    pub async fn submit_data(&self, data: D, timeout: Duration) -> bool {
        self.channel.submit(data, timeout).await
    }

    /// Like [`submit_data`](Self::submit_data), but a refused payload comes back as
    /// `Err(data)` so the caller can retry it later.
    pub async fn try_submit_data(&self, data: D, timeout: Duration) -> Result<(), D> {
        self.channel.try_submit(data, timeout).await
    }

    /// [`submit_data`](Self::submit_data) with [`ServerConfig::submit_timeout`].
    pub async fn submit(&self, data: D) -> bool {
        self.submit_data(data, self.config.submit_timeout).await
    }

    /// Asks the worker to stop; same timing contract as [`submit_data`](Self::submit_data).
    ///
    /// Once accepted, the worker exits and every later submit returns `false`.
    pub async fn request_shutdown(&self, timeout: Duration) -> bool {
        self.channel.shutdown_request(timeout).await
    }

    /// Registers a state observer.
    pub fn add_state_observer(&self, observer: Arc<dyn StateObserver>) {
        self.observers.add(observer);
    }

    /// Unregisters one registration of `observer`; returns `false` if absent.
    pub fn remove_state_observer(&self, observer: &Arc<dyn StateObserver>) -> bool {
        self.observers.remove(observer)
    }

    /// Current lifecycle status of the worker.
    pub fn status(&self) -> Status {
        self.status.get()
    }

    /// Subscribes to [`ObserverFault`]s published after this call.
    pub fn subscribe_faults(&self) -> broadcast::Receiver<ObserverFault> {
        self.faults.subscribe()
    }

    /// The injected work handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// The server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    async fn serve(&self, token: &CancellationToken) -> Result<(), ServerError> {
        loop {
            let msg = self.enter(State::Waiting, self.channel.take(token)).await;
            let Message::Request(data) = msg else {
                return Ok(());
            };

            self.enter(
                State::Processing,
                self.handler.process(data, token.child_token()),
            )
            .await
            .map_err(|source| ServerError::Handler {
                state: State::Processing,
                source,
            })?;

            self.enter(State::Sending, self.handler.send(token.child_token()))
                .await
                .map_err(|source| ServerError::Handler {
                    state: State::Sending,
                    source,
                })?;
        }
    }

    /// Enters `state`: notifies observers, then runs `work`.
    pub(crate) async fn enter<F: Future>(&self, state: State, work: F) -> F::Output {
        self.status.set(state.into());
        debug!(state = state.as_label(), "entering state");

        for failure in self.observers.notify(|observer| announce(observer, state)) {
            let fault = ObserverFault::new(failure.observer.name(), state, failure.message);
            warn!(
                observer = fault.observer,
                state = state.as_label(),
                message = %fault.message,
                "state observer panicked"
            );
            self.faults.publish(fault);
        }

        work.await
    }
}

/// Marks the server terminated when the worker loop is left, including by unwinding
/// or by dropping the `run` future.
struct Teardown<'a, D> {
    channel: &'a Rendezvous<D>,
    status: &'a StatusCell,
}

impl<D> Drop for Teardown<'_, D> {
    fn drop(&mut self) {
        self.channel.close();
        self.status.set(Status::Terminated);
    }
}

impl<D, H> std::fmt::Debug for Server<D, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("status", &self.status.get())
            .field("observers", &self.observers.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
