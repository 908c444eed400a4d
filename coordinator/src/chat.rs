//! Chat receipts for confirmed payments.

use lumenbatch_common::{Result, TransactionId, Username};

/// Sends a chat message to a recipient referencing their payment.
#[async_trait::async_trait]
pub trait ChatSender: Send + Sync {
    /// Send a payment receipt. Outcome is logged by the caller; it never
    /// affects the batch result.
    async fn send_payment_message(&self, recipient: &Username, tx_id: &TransactionId)
        -> Result<()>;
}

/// Default sender that logs receipts without delivering them.
pub struct LoggingChatSender;

#[async_trait::async_trait]
impl ChatSender for LoggingChatSender {
    async fn send_payment_message(
        &self,
        recipient: &Username,
        tx_id: &TransactionId,
    ) -> Result<()> {
        tracing::info!(
            recipient = %recipient,
            tx_id = %tx_id,
            "payment receipt (not delivered)"
        );
        Ok(())
    }
}
