//! Batch payment data model and per-payment status state machine.

use serde::{Deserialize, Serialize};

use crate::error::BatchError;
use crate::identifiers::{TransactionId, Username};
use crate::time::TimeMs;

/// Status of a single payment within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// The ledger accepted the transaction but has not confirmed it.
    Pending,
    /// The transaction was confirmed into a closed block.
    Completed,
    /// The payment failed during prepare, submit, or on the ledger.
    Error,
}

impl PaymentStatus {
    /// Check if this is a terminal status.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }

    /// Human-readable label matching the status.
    pub fn description(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Error => "error",
        }
    }

    /// Check if transition to the given status is legal. The status is
    /// monotone: the only non-identity transitions are PENDING to a
    /// terminal status.
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        *self == next || (*self == PaymentStatus::Pending && next.is_terminal())
    }
}

/// A single payment request in a batch, as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Recipient identifier. May resolve to an on-ledger account or to a
    /// relay-only assertion.
    pub recipient: String,
    /// Amount in the ledger's native asset, as a decimal string.
    pub amount: String,
    /// Optional plaintext message, encrypted into a note when present.
    pub message: Option<String>,
}

impl PaymentRequest {
    /// Create a request with no message.
    pub fn new(recipient: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            amount: amount.into(),
            message: None,
        }
    }

    /// Attach a message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// User-visible error attached to a failed payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPaymentError {
    /// Human-readable message.
    pub message: String,
}

/// The per-payment slot in a batch result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPaymentResult {
    /// Recipient username the payment was addressed (or attempted) to.
    pub username: Username,
    /// When this payment entered the submit stage.
    pub start_time: TimeMs,
    /// When the submit call returned.
    pub submitted_time: Option<TimeMs>,
    /// When the payment reached a terminal status.
    pub end_time: Option<TimeMs>,
    /// On-ledger transaction ID, set at submit time.
    pub tx_id: Option<TransactionId>,
    /// Current status.
    pub status: PaymentStatus,
    /// Human label derived from `status`.
    pub status_description: String,
    /// Error details when `status` is ERROR.
    pub error: Option<BatchPaymentError>,
}

impl BatchPaymentResult {
    /// Create a fresh result slot, pending by default.
    pub fn new(username: Username) -> Self {
        Self {
            username,
            start_time: TimeMs::now(),
            submitted_time: None,
            end_time: None,
            tx_id: None,
            status: PaymentStatus::Pending,
            status_description: PaymentStatus::Pending.description().to_string(),
            error: None,
        }
    }

    /// Mark the payment failed with the given error.
    pub fn mark_error(&mut self, err: &BatchError) {
        self.set_status(PaymentStatus::Error);
        self.end_time = Some(TimeMs::now());
        self.error = Some(BatchPaymentError {
            message: err.to_string(),
        });
    }

    /// Mark the payment confirmed.
    pub fn mark_completed(&mut self) {
        self.set_status(PaymentStatus::Completed);
        self.end_time = Some(TimeMs::now());
    }

    /// Record the ledger's pending acknowledgement.
    pub fn mark_pending(&mut self, tx_id: TransactionId) {
        self.set_status(PaymentStatus::Pending);
        self.tx_id = Some(tx_id);
    }

    /// Apply a status update from the ledger listener. Returns true if the
    /// payment reached a terminal status.
    pub fn apply_update(&mut self, status: PaymentStatus) -> bool {
        self.set_status(status);
        if status.is_terminal() {
            self.end_time = Some(TimeMs::now());
        }
        status.is_terminal()
    }

    fn set_status(&mut self, status: PaymentStatus) {
        self.status = status;
        self.status_description = status.description().to_string();
    }
}

/// The aggregate returned by a batch run. Payments appear in the same order
/// as the input request list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    /// Per-payment results, in input order.
    pub payments: Vec<BatchPaymentResult>,

    /// When the batch call started.
    pub start_time: TimeMs,
    /// When all payments finished preparing.
    pub prepared_time: TimeMs,
    /// When the last submission returned.
    pub all_submitted_time: TimeMs,
    /// When the batch call finished.
    pub end_time: TimeMs,

    /// Payments that ended COMPLETED.
    pub count_success: i64,
    /// Payments still PENDING when the batch returned.
    pub count_pending: i64,
    /// Payments that ended ERROR.
    pub count_error: i64,

    /// `end_time - start_time`.
    pub overall_duration_ms: i64,
    /// `prepared_time - start_time`.
    pub prepare_duration_ms: i64,
    /// `all_submitted_time - prepared_time`.
    pub submit_duration_ms: i64,
    /// `end_time - all_submitted_time`.
    pub wait_duration_ms: i64,

    /// Mean duration of terminal payments. Zero when none are terminal.
    pub avg_duration_ms: i64,
    /// Mean duration of COMPLETED payments. Zero when none completed.
    pub avg_success_duration_ms: i64,
    /// Mean duration of ERROR payments. Zero when none errored.
    pub avg_error_duration_ms: i64,
}
