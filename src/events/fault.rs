use std::time::SystemTime;

use crate::core::State;

/// A state observer panicked while being notified.
///
/// ## Example
/// ```rust
/// use handoff::{ObserverFault, State};
///
/// let fault = ObserverFault::new("metrics", State::Waiting, "boom");
/// assert_eq!(fault.observer, "metrics");
/// assert_eq!(fault.to_string(), "observer 'metrics' panicked on waiting: boom");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverFault {
    /// Name reported by [`StateObserver::name`](crate::StateObserver::name).
    pub observer: &'static str,
    /// State whose notification panicked.
    pub state: State,
    /// Panic payload rendered as text (`"unknown panic"` for non-string payloads).
    pub message: String,
    /// Wall-clock time of the failure.
    pub at: SystemTime,
}

impl ObserverFault {
    /// Creates a fault stamped with the current time.
    pub fn new(observer: &'static str, state: State, message: impl Into<String>) -> Self {
        Self {
            observer,
            state,
            message: message.into(),
            at: SystemTime::now(),
        }
    }
}

impl std::fmt::Display for ObserverFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "observer '{}' panicked on {}: {}",
            self.observer, self.state, self.message
        )
    }
}
