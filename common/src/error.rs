//! Error types for batch payment processing.

use thiserror::Error;

/// Main error type for batch payment operations.
///
/// Per-payment failures travel through the batch as error entries in the
/// result list; only sender lookup aborts a batch outright.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Could not load the sender's account and signing seed. Fatal for the
    /// whole batch.
    #[error("error looking up sender: {0}")]
    SenderLookup(String),

    /// Recipient resolution failed. The underlying cause is logged but
    /// never surfaced to the user.
    #[error("error looking up recipient")]
    RecipientLookup,

    /// The amount string did not parse as a non-negative decimal.
    #[error("invalid amount {0}")]
    InvalidAmount(String),

    /// The amount is below the minimum needed to fund the destination.
    #[error("you must send at least {min} XLM to fund the account for {recipient}")]
    BelowMinimum { min: String, recipient: String },

    /// The sequence provider could not allocate a seqno.
    #[error("error acquiring sequence number: {0}")]
    SeqnoUnavailable(String),

    /// Transaction construction or signing failed.
    #[error("error signing transaction: {0}")]
    Signing(String),

    /// Encrypting the payment note failed. The seqno consumed by the signed
    /// transaction is wasted.
    #[error("error encrypting note: {0}")]
    NoteEncryption(String),

    /// Building the relay escrow failed.
    #[error("error creating relay payment: {0}")]
    Relay(String),

    /// The ledger gateway rejected a submission.
    #[error("submit failed: {0}")]
    Submit(String),

    /// A gateway query (seqno, funded check) failed.
    #[error("ledger gateway error: {0}")]
    Gateway(String),

    /// The status listener could not be subscribed or has gone away.
    #[error("status listener error: {0}")]
    Listener(String),

    /// The chat send failed. Logged only, never part of a batch result.
    #[error("chat send error: {0}")]
    Chat(String),

    /// Invalid configuration or batch arguments.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for batch payment operations.
pub type Result<T> = std::result::Result<T, BatchError>;
