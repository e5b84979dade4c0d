//! # Fault side channel.
//!
//! Observer callbacks run on the worker task and must not stop it. When one panics,
//! the worker turns the panic into an [`ObserverFault`] and hands it to the [`Bus`];
//! interested parties read it from [`Server::subscribe_faults`](crate::Server::subscribe_faults).
//!
//! ```text
//!   enter(state) ─► notify observers ─► panic caught ─► Bus::publish(fault)
//!                                                            │
//!                        subscribe_faults() #1 ◄─────────────┤
//!                        subscribe_faults() #2 ◄─────────────┘
//! ```
//!
//! Publishing never waits for readers. A reader that falls more than
//! `ServerConfig::fault_capacity` reports behind gets `RecvError::Lagged` and
//! resumes at the oldest retained fault. Faults raised while nobody listens are dropped.

use tokio::sync::broadcast;

use super::fault::ObserverFault;

/// Broadcast channel carrying [`ObserverFault`]s from the worker to any readers.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<ObserverFault>,
}

impl Bus {
    /// Creates a bus retaining up to `capacity` unread faults (at least one).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Reports `fault` to every current receiver.
    pub fn publish(&self, fault: ObserverFault) {
        // Err only means there are no receivers right now.
        let _ = self.tx.send(fault);
    }

    /// New receiver; it sees only faults published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ObserverFault> {
        self.tx.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
