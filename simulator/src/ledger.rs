//! Simulated ledger gateway for testing.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use lumenbatch_common::{
    AccountId, PaymentStatus, Result, Seqno, TransactionId,
};
use lumenbatch_crypto::{hex, sha256_hex};
use lumenbatch_ledger::{
    DirectPost, LedgerGateway, RelayPost, StatusFeed, SubmitResult, TxStatusUpdate,
};

/// An in-memory stand-in for the ledger gateway.
///
/// Every submission is acknowledged as pending; a background task publishes
/// the COMPLETED status onto the feed after a configurable delay. Setting
/// `drop_every` swallows every Nth confirmation so timeout handling can be
/// exercised.
pub struct SimulatedLedger {
    base_seqno: u64,
    funded: RwLock<HashSet<String>>,
    feed: Arc<StatusFeed>,
    status_delay: Duration,
    /// Swallow every Nth confirmation (0 = never).
    drop_every: usize,
    submissions: AtomicU64,
}

impl SimulatedLedger {
    /// Create a ledger with the given starting seqno for the sender.
    pub fn new(base_seqno: u64, feed: Arc<StatusFeed>, status_delay: Duration, drop_every: usize) -> Self {
        Self {
            base_seqno,
            funded: RwLock::new(HashSet::new()),
            feed,
            status_delay,
            drop_every,
            submissions: AtomicU64::new(0),
        }
    }

    /// Mark an account as existing on the ledger.
    pub async fn fund_account(&self, account: &AccountId) {
        self.funded.write().await.insert(account.as_str().to_string());
    }

    /// Number of submissions accepted so far.
    pub fn submission_count(&self) -> u64 {
        self.submissions.load(Ordering::Relaxed)
    }

    fn tx_id_for(signed_transaction: &str) -> TransactionId {
        // the ledger derives the transaction ID by hashing the envelope
        // payload, matching the builder's hash
        match signed_transaction
            .split_once('.')
            .and_then(|(payload_hex, _)| hex::decode(payload_hex))
        {
            Some(payload) => TransactionId::new(sha256_hex(&payload)),
            None => TransactionId::new(sha256_hex(signed_transaction.as_bytes())),
        }
    }

    fn acknowledge(&self, tx_id: TransactionId) -> SubmitResult {
        let n = self.submissions.fetch_add(1, Ordering::Relaxed) + 1;

        let dropped = self.drop_every > 0 && n as usize % self.drop_every == 0;
        if dropped {
            debug!(tx_id = %tx_id, "confirmation for this submission will never arrive");
        } else {
            let feed = self.feed.clone();
            let delay = self.status_delay;
            let update_tx = tx_id.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                feed.publish(TxStatusUpdate {
                    tx_id: update_tx,
                    status: PaymentStatus::Completed,
                });
            });
        }

        SubmitResult {
            tx_id,
            pending: true,
        }
    }
}

#[async_trait::async_trait]
impl LedgerGateway for SimulatedLedger {
    async fn account_seqno(&self, account: &AccountId) -> Result<Seqno> {
        debug!(account = %account, seqno = self.base_seqno, "seqno query");
        Ok(Seqno::new(self.base_seqno))
    }

    async fn is_account_funded(&self, account: &AccountId) -> Result<bool> {
        Ok(self.funded.read().await.contains(account.as_str()))
    }

    async fn submit_payment(&self, post: DirectPost) -> Result<SubmitResult> {
        debug!(to = ?post.to, "direct payment submitted");
        Ok(self.acknowledge(Self::tx_id_for(&post.signed_transaction)))
    }

    async fn submit_relay_payment(&self, post: RelayPost) -> Result<SubmitResult> {
        debug!(assertion = %post.to_assertion, relay_account = %post.relay_account, "relay payment submitted");
        Ok(self.acknowledge(Self::tx_id_for(&post.signed_transaction)))
    }

    async fn add_pending_tx(
        &self,
        account: &AccountId,
        tx_id: &TransactionId,
        seqno: Seqno,
    ) -> Result<()> {
        debug!(account = %account, tx_id = %tx_id, seqno = %seqno, "pending tx registered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_funded_accounts() {
        let feed = Arc::new(StatusFeed::new());
        let ledger = SimulatedLedger::new(0, feed, Duration::from_millis(10), 0);

        let account = AccountId::new("GTEST");
        assert!(!ledger.is_account_funded(&account).await.unwrap());

        ledger.fund_account(&account).await;
        assert!(ledger.is_account_funded(&account).await.unwrap());
    }

    #[tokio::test]
    async fn test_submission_publishes_completion() {
        let feed = Arc::new(StatusFeed::new());
        let ledger = SimulatedLedger::new(0, feed.clone(), Duration::from_millis(10), 0);
        let (_id, mut rx) = feed.subscribe();

        let res = ledger
            .submit_payment(DirectPost {
                to: None,
                signed_transaction: "deadbeef.00".to_string(),
                note_box: None,
                quick_return: true,
            })
            .await
            .unwrap();
        assert!(res.pending);

        let update = rx.recv().await.unwrap();
        assert_eq!(update.tx_id, res.tx_id);
        assert_eq!(update.status, PaymentStatus::Completed);
    }

    #[tokio::test]
    async fn test_drop_every_swallows_confirmations() {
        let feed = Arc::new(StatusFeed::new());
        let ledger = SimulatedLedger::new(0, feed.clone(), Duration::from_millis(10), 1);
        let (_id, mut rx) = feed.subscribe();

        ledger
            .submit_payment(DirectPost {
                to: None,
                signed_transaction: "deadbeef.00".to_string(),
                note_box: None,
                quick_return: true,
            })
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }
}
