//! Wire types exchanged with the ledger gateway.

use serde::{Deserialize, Serialize};

use lumenbatch_common::{AccountId, PaymentStatus, TeamId, TransactionId, Username};

/// Result of a submission accepted by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResult {
    /// The on-ledger transaction ID assigned by the gateway.
    pub tx_id: TransactionId,
    /// True when the gateway acknowledged without waiting for ledger close.
    pub pending: bool,
}

/// A transaction status change observed on the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxStatusUpdate {
    /// The transaction the update refers to.
    pub tx_id: TransactionId,
    /// The new status.
    pub status: PaymentStatus,
}

/// A signed direct payment ready for submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectPost {
    /// Resolved recipient, for receipt addressing.
    pub to: Option<Username>,
    /// Signed transaction envelope.
    pub signed_transaction: String,
    /// Sealed note bound to the transaction hash, when a message was given.
    pub note_box: Option<String>,
    /// Ask the gateway to acknowledge without waiting for ledger close.
    pub quick_return: bool,
}

/// A signed relay payment ready for submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayPost {
    /// Resolved recipient, when the assertion mapped to a known user.
    pub to: Option<Username>,
    /// The assertion the relay is claimable by.
    pub to_assertion: String,
    /// The ephemeral escrow account funded by this payment.
    pub relay_account: AccountId,
    /// Team under which the escrow is held.
    pub team_id: TeamId,
    /// Sealed box holding the escrow key, amount, and note.
    pub box_blob: String,
    /// Signed funding transaction envelope.
    pub signed_transaction: String,
    /// Ask the gateway to acknowledge without waiting for ledger close.
    pub quick_return: bool,
}
