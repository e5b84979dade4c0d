//! # Server and handler configuration.
//!
//! Provides [`ServerConfig`] (settings of the server core) and [`DelayConfig`]
//! (durations for the reference [`DelayHandler`](crate::DelayHandler)).
//!
//! ## Sentinel values
//! - `fault_capacity = 0` → clamped to 1 by the fault bus
//! - `processing = 0s` / `sending = 0s` → the handler returns immediately

use std::time::Duration;

/// Configuration of a [`Server`](crate::Server).
///
/// ## Field semantics
/// - `submit_timeout`: timeout used by [`Server::submit`](crate::Server::submit)
/// - `fault_capacity`: ring buffer size of the observer-fault bus (min 1)
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Default handoff timeout for [`Server::submit`](crate::Server::submit).
    ///
    /// Callers that need another timeout use `submit_data` directly.
    pub submit_timeout: Duration,

    /// Capacity of the broadcast channel carrying [`ObserverFault`](crate::ObserverFault)s.
    ///
    /// Fault receivers that lag behind more than `fault_capacity` reports skip the oldest ones.
    pub fault_capacity: usize,
}

impl ServerConfig {
    /// Returns the fault bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn fault_capacity_clamped(&self) -> usize {
        self.fault_capacity.max(1)
    }
}

impl Default for ServerConfig {
    /// Default configuration:
    ///
    /// - `submit_timeout = 10ms`
    /// - `fault_capacity = 64`
    fn default() -> Self {
        Self {
            submit_timeout: Duration::from_millis(10),
            fault_capacity: 64,
        }
    }
}

/// Durations spent by [`DelayHandler`](crate::DelayHandler) in each working state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DelayConfig {
    /// Time spent in `process`.
    pub processing: Duration,
    /// Time spent in `send`.
    pub sending: Duration,
}

impl DelayConfig {
    /// Creates a config from millisecond values.
    pub fn from_millis(processing: u64, sending: u64) -> Self {
        Self {
            processing: Duration::from_millis(processing),
            sending: Duration::from_millis(sending),
        }
    }

    /// True if neither state sleeps.
    #[inline]
    pub fn is_instant(&self) -> bool {
        self.processing.is_zero() && self.sending.is_zero()
    }
}
