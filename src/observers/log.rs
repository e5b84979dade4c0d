use tracing::info;

use crate::StateObserver;

/// Observer that logs every state entry at `INFO` level.
///
/// Enabled via the `logging` feature. Useful for demos and debugging.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl StateObserver for LogObserver {
    fn on_waiting(&self) {
        info!(state = "waiting", "[waiting] ready for a request");
    }

    fn on_processing(&self) {
        info!(state = "processing", "[processing] request accepted");
    }

    fn on_sending(&self) {
        info!(state = "sending", "[sending] result");
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
