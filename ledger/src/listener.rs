//! Status update fan-out.

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use lumenbatch_common::ListenerId;

use crate::types::TxStatusUpdate;

/// Fans transaction status updates out to subscribers.
///
/// The owner of the gateway connection publishes every observed status
/// change; each subscriber receives its own lossless copy of the stream for
/// the lifetime of its subscription. Updates carry no ordering guarantee
/// across transaction IDs.
pub struct StatusFeed {
    subscribers: DashMap<ListenerId, mpsc::UnboundedSender<TxStatusUpdate>>,
}

impl StatusFeed {
    /// Create an empty feed.
    pub fn new() -> Self {
        Self {
            subscribers: DashMap::new(),
        }
    }

    /// Subscribe to status updates.
    pub fn subscribe(&self) -> (ListenerId, mpsc::UnboundedReceiver<TxStatusUpdate>) {
        let id = ListenerId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.insert(id, tx);
        debug!(listener_id = %id, "status listener subscribed");
        (id, rx)
    }

    /// Drop a subscription.
    pub fn unsubscribe(&self, id: &ListenerId) {
        self.subscribers.remove(id);
        debug!(listener_id = %id, "status listener removed");
    }

    /// Deliver an update to every live subscriber.
    pub fn publish(&self, update: TxStatusUpdate) {
        self.subscribers
            .retain(|_, tx| tx.send(update.clone()).is_ok());
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for StatusFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use lumenbatch_common::{PaymentStatus, TransactionId};

    fn update(tx: &str, status: PaymentStatus) -> TxStatusUpdate {
        TxStatusUpdate {
            tx_id: TransactionId::new(tx),
            status,
        }
    }

    #[tokio::test]
    async fn test_subscribe_publish() {
        let feed = StatusFeed::new();
        let (_id, mut rx) = feed.subscribe();

        feed.publish(update("tx1", PaymentStatus::Completed));

        let got = rx.recv().await.unwrap();
        assert_eq!(got.tx_id, TransactionId::new("tx1"));
        assert_eq!(got.status, PaymentStatus::Completed);
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let feed = StatusFeed::new();
        let (id, mut rx) = feed.subscribe();

        feed.unsubscribe(&id);
        feed.publish(update("tx1", PaymentStatus::Completed));

        // channel is closed once the sender is dropped
        assert!(rx.recv().await.is_none());
        assert_eq!(feed.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_dropped_receiver_is_pruned() {
        let feed = StatusFeed::new();
        let (_id, rx) = feed.subscribe();
        drop(rx);

        feed.publish(update("tx1", PaymentStatus::Pending));
        assert_eq!(feed.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_each_get_updates() {
        let feed = StatusFeed::new();
        let (_a, mut rx_a) = feed.subscribe();
        let (_b, mut rx_b) = feed.subscribe();

        feed.publish(update("tx9", PaymentStatus::Error));

        assert_eq!(rx_a.recv().await.unwrap().tx_id, TransactionId::new("tx9"));
        assert_eq!(rx_b.recv().await.unwrap().tx_id, TransactionId::new("tx9"));
    }
}
