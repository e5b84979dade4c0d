//! Error types used by the server core and work handlers.
//!
//! This module defines two error enums:
//!
//! - [`ServerError`]: errors that end the worker loop.
//! - [`HandlerError`]: errors raised by a [`WorkHandler`](crate::WorkHandler).
//!
//! A rejected handoff is **not** an error: `submit_data`/`request_shutdown` return `false`.
//! Both enums provide `as_label`/`as_message` helpers for logs.

use thiserror::Error;

use crate::core::State;

/// # Errors that terminate the worker loop.
///
/// Cancellation while waiting and an accepted shutdown request end the loop with `Ok(())`;
/// everything else ends up here.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ServerError {
    /// `run` was called on a server whose worker has already been started.
    #[error("server worker already started")]
    AlreadyStarted,

    /// The work handler failed; the worker stops (fail-fast).
    #[error("handler failed while {state}: {source}")]
    Handler {
        /// State whose work failed (`processing` or `sending`).
        state: State,
        /// The handler error.
        #[source]
        source: HandlerError,
    },

    /// OS signal listeners could not be registered.
    #[error("failed to register shutdown signals: {0}")]
    Signal(#[from] std::io::Error),
}

impl ServerError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use handoff::ServerError;
    ///
    /// assert_eq!(ServerError::AlreadyStarted.as_label(), "server_already_started");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ServerError::AlreadyStarted => "server_already_started",
            ServerError::Handler { .. } => "server_handler_failed",
            ServerError::Signal(_) => "server_signal_setup",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ServerError::AlreadyStarted => "worker already started".to_string(),
            ServerError::Handler { state, source } => {
                format!("{state} failed: {}", source.as_message())
            }
            ServerError::Signal(err) => format!("signal setup: {err}"),
        }
    }
}

/// # Errors produced by a work handler.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Processing or sending failed.
    #[error("handler failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Handler observed cancellation and gave up its work.
    #[error("handler cancelled")]
    Canceled,
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        HandlerError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use handoff::HandlerError;
    ///
    /// assert_eq!(HandlerError::fail("disk full").as_label(), "handler_failed");
    /// assert_eq!(HandlerError::Canceled.as_label(), "handler_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Fail { .. } => "handler_failed",
            HandlerError::Canceled => "handler_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Fail { error } => format!("error: {error}"),
            HandlerError::Canceled => "cancelled".to_string(),
        }
    }
}
