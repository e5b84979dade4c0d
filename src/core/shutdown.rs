//! # Process termination signals.
//!
//! [`Server::run_until_signal`](crate::Server::run_until_signal) needs to know when the
//! process is asked to stop. [`ShutdownSignal`] splits that into two steps:
//! [`listen`](ShutdownSignal::listen) registers the listeners up front, so a failure is
//! reported before any worker runs; [`recv`](ShutdownSignal::recv) then waits.
//!
//! Unix stops on `SIGINT`, `SIGTERM` or `SIGQUIT`; Windows on Ctrl-C.

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};
#[cfg(windows)]
use tokio::signal::windows::{CtrlC, ctrl_c};

/// Registered termination-signal listeners.
pub(crate) struct ShutdownSignal {
    #[cfg(unix)]
    listeners: [Signal; 3],
    #[cfg(windows)]
    ctrl_c: CtrlC,
}

impl ShutdownSignal {
    /// Registers the listeners; signals arriving from now on are not missed.
    #[cfg(unix)]
    pub(crate) fn listen() -> std::io::Result<Self> {
        Ok(Self {
            listeners: [
                signal(SignalKind::interrupt())?,
                signal(SignalKind::terminate())?,
                signal(SignalKind::quit())?,
            ],
        })
    }

    #[cfg(windows)]
    pub(crate) fn listen() -> std::io::Result<Self> {
        Ok(Self { ctrl_c: ctrl_c()? })
    }

    /// Completes on the first termination signal.
    #[cfg(unix)]
    pub(crate) async fn recv(&mut self) {
        let [int, term, quit] = &mut self.listeners;
        tokio::select! {
            _ = int.recv() => {},
            _ = term.recv() => {},
            _ = quit.recv() => {},
        }
    }

    #[cfg(windows)]
    pub(crate) async fn recv(&mut self) {
        self.ctrl_c.recv().await;
    }
}
