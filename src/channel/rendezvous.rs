//! # Rendezvous: zero-buffer handoff of one message at a time.
//!
//! The worker announces readiness by posting a single-use **ticket** (a `oneshot`
//! sender). A submitter completes the handoff by taking the ticket and sending its
//! message through it. Nothing is ever buffered on behalf of a submitter.
//!
//! ## Protocol
//! ```text
//! worker: take(token)                        submitter: submit(data, timeout)
//!   ├─► oneshot (ticket, slot)                 ├─► lock ticket receiver    ┐
//!   ├─► post ticket ──────► [ready: cap 1] ──► ├─► recv ticket              │ bounded by
//!   └─► await slot ◄───────────────────────────┴─► ticket.send(Request)     ┘ `timeout`
//! ```
//!
//! ## Rules
//! - At most one live ticket exists, so at most one message is in flight.
//! - A submit succeeds only if a worker is (or becomes) blocked in `take` within the timeout.
//! - A failed submit is never queued or retried. `submit` drops the message,
//!   [`try_submit`](Rendezvous::try_submit) hands it back to the caller.
//! - Tickets whose worker gave up are skipped by the next submitter.
//! - Cancelling or closing during `take` returns [`Message::Shutdown`], unless a submitter
//!   completed the handoff at the same instant: an accepted message is always returned.
//! - After [`close`](Rendezvous::close) every submit returns `false` at once,
//!   including submits already waiting for a ticket, and a blocked `take` returns.

use std::time::Duration;

use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

/// Item handed from a submitter to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message<D> {
    /// A unit of work.
    Request(D),
    /// Terminal signal: the worker stops reading after it.
    Shutdown,
}

type Ticket<D> = oneshot::Sender<Message<D>>;

/// Zero-capacity channel between any number of submitters and a single worker.
///
/// ## Example
/// ```rust
/// use std::{sync::Arc, time::Duration};
/// use tokio_util::sync::CancellationToken;
/// use handoff::{Message, Rendezvous};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let chan = Arc::new(Rendezvous::new());
///
/// // Nobody is taking: the handoff times out and the data is dropped.
/// assert!(!chan.submit("early", Duration::from_millis(5)).await);
///
/// let worker = {
///     let chan = Arc::clone(&chan);
///     tokio::spawn(async move { chan.take(&CancellationToken::new()).await })
/// };
/// assert!(chan.submit("hello", Duration::from_secs(1)).await);
/// assert_eq!(worker.await.unwrap(), Message::Request("hello"));
/// # }
/// ```
pub struct Rendezvous<D> {
    ready_tx: mpsc::Sender<Ticket<D>>,
    ready_rx: Mutex<mpsc::Receiver<Ticket<D>>>,
    closed: CancellationToken,
}

impl<D> Rendezvous<D> {
    /// Creates an open channel with no worker waiting.
    pub fn new() -> Self {
        let (ready_tx, ready_rx) = mpsc::channel(1);
        Self {
            ready_tx,
            ready_rx: Mutex::new(ready_rx),
            closed: CancellationToken::new(),
        }
    }

    /// Hands `data` to a waiting worker.
    ///
    /// Returns `true` if the worker received it within `timeout`, `false` otherwise.
    pub async fn submit(&self, data: D, timeout: Duration) -> bool {
        self.try_submit(data, timeout).await.is_ok()
    }

    /// Like [`submit`](Self::submit), but a refused payload is given back as `Err(data)`.
    pub async fn try_submit(&self, data: D, timeout: Duration) -> Result<(), D> {
        match self.offer(Message::Request(data), timeout).await {
            Some(Message::Request(data)) => Err(data),
            // only a Request was offered
            Some(Message::Shutdown) | None => Ok(()),
        }
    }

    /// Hands [`Message::Shutdown`] to a waiting worker, with the same contract as [`submit`](Self::submit).
    pub async fn shutdown_request(&self, timeout: Duration) -> bool {
        self.offer(Message::Shutdown, timeout).await.is_none()
    }

    /// Waits for the next message.
    ///
    /// This is the only unbounded wait of the worker. Cancellation of `token`
    /// or closing the channel (before or during the wait) yields [`Message::Shutdown`].
    pub async fn take(&self, token: &CancellationToken) -> Message<D> {
        if token.is_cancelled() || self.is_closed() {
            return Message::Shutdown;
        }

        let (ticket, mut slot) = oneshot::channel();
        select! {
            biased;
            posted = self.ready_tx.send(ticket) => {
                if posted.is_err() {
                    return Message::Shutdown;
                }
            }
            _ = token.cancelled() => return Message::Shutdown,
            _ = self.closed.cancelled() => return Message::Shutdown,
        }

        select! {
            biased;
            received = &mut slot => received.unwrap_or(Message::Shutdown),
            _ = token.cancelled() => abandon(slot),
            _ = self.closed.cancelled() => abandon(slot),
        }
    }

    /// Closes the channel; pending and future submits fail immediately.
    pub fn close(&self) {
        self.closed.cancel();
    }

    /// True once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Offers `msg` for at most `timeout`; returns it back unless it was delivered.
    async fn offer(&self, msg: Message<D>, timeout: Duration) -> Option<Message<D>> {
        if self.is_closed() {
            return Some(msg);
        }

        // Between awaits `pending` is `None` only once the message was delivered.
        let mut pending = Some(msg);
        let handoff = async {
            let mut tickets = self.ready_rx.lock().await;
            while let Some(ticket) = tickets.recv().await {
                let Some(msg) = pending.take() else { break };
                match ticket.send(msg) {
                    Ok(()) => break,
                    // stale ticket: its worker stopped waiting
                    Err(returned) => pending = Some(returned),
                }
            }
        };

        select! {
            biased;
            _ = self.closed.cancelled() => {}
            _ = time::timeout(timeout, handoff) => {}
        }
        pending
    }
}

fn abandon<D>(mut slot: oneshot::Receiver<Message<D>>) -> Message<D> {
    // a message that landed before the close still wins
    slot.close();
    slot.try_recv().unwrap_or(Message::Shutdown)
}

impl<D> Default for Rendezvous<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> std::fmt::Debug for Rendezvous<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rendezvous")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn spawn_taker(
        chan: &Arc<Rendezvous<&'static str>>,
        token: CancellationToken,
    ) -> tokio::task::JoinHandle<Message<&'static str>> {
        let chan = Arc::clone(chan);
        tokio::spawn(async move { chan.take(&token).await })
    }

    #[tokio::test]
    async fn submit_without_taker_times_out() {
        let chan = Rendezvous::new();
        assert!(!chan.submit("nobody home", Duration::from_millis(10)).await);
        assert!(!chan.shutdown_request(Duration::ZERO).await);
    }

    #[tokio::test]
    async fn accepted_payload_reaches_taker() {
        let chan = Arc::new(Rendezvous::new());
        let taker = spawn_taker(&chan, CancellationToken::new());

        assert!(chan.submit("Request 0", Duration::from_secs(1)).await);
        assert_eq!(taker.await.unwrap(), Message::Request("Request 0"));

        // The ticket was consumed; the next submit has nobody to talk to.
        assert!(!chan.submit("Request 1", Duration::from_millis(10)).await);
    }

    #[tokio::test]
    async fn shutdown_request_is_delivered_as_shutdown() {
        let chan = Arc::new(Rendezvous::new());
        let taker = spawn_taker(&chan, CancellationToken::new());

        assert!(chan.shutdown_request(Duration::from_secs(1)).await);
        assert_eq!(taker.await.unwrap(), Message::Shutdown);
    }

    #[tokio::test]
    async fn cancelled_take_yields_shutdown() {
        let chan = Arc::new(Rendezvous::new());
        let token = CancellationToken::new();
        let taker = spawn_taker(&chan, token.clone());

        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();
        assert_eq!(taker.await.unwrap(), Message::Shutdown);

        // A token that is already cancelled never blocks.
        assert_eq!(chan.take(&token).await, Message::Shutdown);
    }

    #[tokio::test]
    async fn stale_ticket_is_skipped() {
        let chan = Arc::new(Rendezvous::new());

        let first = CancellationToken::new();
        let abandoned = spawn_taker(&chan, first.clone());
        tokio::time::sleep(Duration::from_millis(10)).await;
        first.cancel();
        assert_eq!(abandoned.await.unwrap(), Message::Shutdown);

        let taker = spawn_taker(&chan, CancellationToken::new());
        assert!(chan.submit("fresh", Duration::from_secs(1)).await);
        assert_eq!(taker.await.unwrap(), Message::Request("fresh"));
    }

    #[tokio::test]
    async fn close_refuses_pending_and_future_submits() {
        let chan = Arc::new(Rendezvous::<&'static str>::new());

        let pending = {
            let chan = Arc::clone(&chan);
            tokio::spawn(async move { chan.submit("late", Duration::from_secs(5)).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        chan.close();

        let accepted = tokio::time::timeout(Duration::from_secs(1), pending)
            .await
            .expect("pending submit released by close")
            .unwrap();
        assert!(!accepted);
        assert!(chan.is_closed());
        assert!(!chan.submit("after", Duration::from_secs(5)).await);
        assert_eq!(chan.take(&CancellationToken::new()).await, Message::Shutdown);
    }

    #[tokio::test]
    async fn close_releases_blocked_taker() {
        let chan = Arc::new(Rendezvous::new());
        let taker = spawn_taker(&chan, CancellationToken::new());
        tokio::time::sleep(Duration::from_millis(10)).await;

        chan.close();

        let msg = tokio::time::timeout(Duration::from_secs(1), taker)
            .await
            .expect("taker released by close")
            .unwrap();
        assert_eq!(msg, Message::Shutdown);
    }

    #[tokio::test]
    async fn try_submit_returns_refused_payload() {
        let chan = Arc::new(Rendezvous::new());
        assert_eq!(
            chan.try_submit(String::from("Request 0"), Duration::from_millis(10)).await,
            Err(String::from("Request 0"))
        );

        let taker = {
            let chan = Arc::clone(&chan);
            tokio::spawn(async move { chan.take(&CancellationToken::new()).await })
        };
        assert_eq!(
            chan.try_submit(String::from("Request 1"), Duration::from_secs(1)).await,
            Ok(())
        );
        assert_eq!(taker.await.unwrap(), Message::Request(String::from("Request 1")));

        chan.close();
        assert_eq!(
            chan.try_submit(String::from("Request 2"), Duration::from_secs(1)).await,
            Err(String::from("Request 2"))
        );
    }

    #[tokio::test]
    async fn zero_timeout_succeeds_when_taker_is_blocked() {
        let chan = Arc::new(Rendezvous::new());
        let taker = spawn_taker(&chan, CancellationToken::new());
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(chan.submit("now", Duration::ZERO).await);
        assert_eq!(taker.await.unwrap(), Message::Request("now"));
    }
}
