//! Non-blocking sends on the inter-actor queues.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

/// Hand `item` to `tx` without waiting.
///
/// A full or closed queue drops the item and logs it; the caller never
/// blocks. Returns whether the item was queued.
pub fn offer<T: std::fmt::Debug>(tx: &mpsc::Sender<T>, item: T, queue: &'static str) -> bool {
    match tx.try_send(item) {
        Ok(()) => true,
        Err(TrySendError::Full(item)) => {
            warn!(queue, item = ?item, "Queue full, dropping message");
            false
        }
        Err(TrySendError::Closed(item)) => {
            warn!(queue, item = ?item, "Queue closed, dropping message");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offer_drops_when_full() {
        let (tx, mut rx) = mpsc::channel(1);

        assert!(offer(&tx, 1, "test"));
        assert!(!offer(&tx, 2, "test"));

        assert_eq!(rx.recv().await, Some(1));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_offer_to_closed_queue() {
        let (tx, rx) = mpsc::channel::<u8>(1);
        drop(rx);
        assert!(!offer(&tx, 1, "test"));
    }
}
