//! # Worker states.
//!
//! ```text
//!            ┌──────────────────────────────────────┐
//!            ▼                                      │
//!   Idle ─► Waiting ─► Processing ─► Sending ───────┘
//!            │
//!            └─► Terminated   (Shutdown, cancellation, handler failure)
//! ```
//!
//! [`State`] is what observers are told about; [`Status`] adds the two endpoints
//! of the worker lifecycle so callers can query the server at any time.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// State entered by the worker; one notification is emitted per entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Blocked on the rendezvous channel.
    Waiting,
    /// Running [`WorkHandler::process`](crate::WorkHandler::process).
    Processing,
    /// Running [`WorkHandler::send`](crate::WorkHandler::send).
    Sending,
}

impl State {
    /// Returns a short stable label for logs.
    pub fn as_label(self) -> &'static str {
        match self {
            State::Waiting => "waiting",
            State::Processing => "processing",
            State::Sending => "sending",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Lifecycle status of a server, as returned by [`Server::status`](crate::Server::status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Worker not started yet.
    Idle,
    /// Worker is in [`State::Waiting`].
    Waiting,
    /// Worker is in [`State::Processing`].
    Processing,
    /// Worker is in [`State::Sending`].
    Sending,
    /// Worker loop has returned; the server cannot be restarted.
    Terminated,
}

impl From<State> for Status {
    fn from(state: State) -> Self {
        match state {
            State::Waiting => Status::Waiting,
            State::Processing => Status::Processing,
            State::Sending => Status::Sending,
        }
    }
}

/// Lock-free status cell shared between the worker and readers.
#[derive(Debug)]
pub(crate) struct StatusCell(AtomicU8);

impl StatusCell {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(Status::Idle as u8))
    }

    pub(crate) fn set(&self, status: Status) {
        self.0.store(status as u8, Ordering::Release);
    }

    pub(crate) fn get(&self) -> Status {
        match self.0.load(Ordering::Acquire) {
            1 => Status::Waiting,
            2 => Status::Processing,
            3 => Status::Sending,
            4 => Status::Terminated,
            _ => Status::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_cell_round_trips_every_status() {
        let cell = StatusCell::new();
        assert_eq!(cell.get(), Status::Idle);

        for status in [
            Status::Waiting,
            Status::Processing,
            Status::Sending,
            Status::Terminated,
            Status::Idle,
        ] {
            cell.set(status);
            assert_eq!(cell.get(), status);
        }
    }

    #[test]
    fn state_display_matches_label() {
        assert_eq!(State::Processing.to_string(), "processing");
        assert_eq!(Status::from(State::Sending), Status::Sending);
    }
}
