//! Contract against the ledger gateway.

use lumenbatch_common::{AccountId, Result, Seqno, TransactionId};

use crate::types::{DirectPost, RelayPost, SubmitResult};

/// The ledger gateway consumed by the batch coordinator.
///
/// Implementations wrap the network RPC to the ledger; the simulator and
/// test suites provide in-memory versions.
#[async_trait::async_trait]
pub trait LedgerGateway: Send + Sync {
    /// The account's current on-ledger sequence number.
    async fn account_seqno(&self, account: &AccountId) -> Result<Seqno>;

    /// Whether the account exists on the ledger with at least the minimum
    /// reserve.
    async fn is_account_funded(&self, account: &AccountId) -> Result<bool>;

    /// Submit a signed direct payment.
    async fn submit_payment(&self, post: DirectPost) -> Result<SubmitResult>;

    /// Submit a signed relay payment.
    async fn submit_relay_payment(&self, post: RelayPost) -> Result<SubmitResult>;

    /// Register a transaction the wallet expects to settle. Best-effort;
    /// callers log failures and continue.
    async fn add_pending_tx(
        &self,
        account: &AccountId,
        tx_id: &TransactionId,
        seqno: Seqno,
    ) -> Result<()>;
}
