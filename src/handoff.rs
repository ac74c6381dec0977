//! Single-slot, single-use hand-off channel.
//!
//! Any number of producers may [`offer`](HandoffSender::offer) a value; the
//! first one to fill the slot wins. Offering never blocks: once the slot is
//! full, or the consumer has already taken its value, later offers are
//! dropped and `offer` returns `false`. The receiving half is consumed by
//! [`take`](HandoffReceiver::take), so a consumer can observe at most one
//! value.

use tokio::sync::mpsc;

pub struct HandoffSender<T> {
    tx: mpsc::Sender<T>,
}

// Manual impl: `T` itself does not need to be `Clone`.
impl<T> Clone for HandoffSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

pub struct HandoffReceiver<T> {
    rx: mpsc::Receiver<T>,
}

/// Creates a connected sender/receiver pair with a single slot.
///
/// # Example
///
/// ```
/// let (tx, rx) = handoff::channel();
/// assert!(tx.offer("first"));
/// assert!(!tx.offer("second"));
/// assert_eq!(rx.take().await, Some("first"));
/// ```
pub fn channel<T>() -> (HandoffSender<T>, HandoffReceiver<T>) {
    let (tx, rx) = mpsc::channel(1);
    (HandoffSender { tx }, HandoffReceiver { rx })
}

impl<T> HandoffSender<T> {
    /// Offers `value` to the consumer. Returns `true` if it was accepted.
    pub fn offer(&self, value: T) -> bool {
        self.tx.try_send(value).is_ok()
    }
}

impl<T> HandoffReceiver<T> {
    /// Waits for the first offered value.
    ///
    /// Returns `None` only if every sender was dropped without offering.
    /// There is no timeout.
    pub async fn take(mut self) -> Option<T> {
        self.rx.recv().await
    }
}
