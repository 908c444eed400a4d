//! Recipient resolution.

use lumenbatch_common::{AccountId, Result, Username};

/// What a recipient identifier resolved to.
#[derive(Debug, Clone)]
pub struct ResolvedRecipient {
    /// Normalized username for receipts and chat.
    pub username: Username,
    /// On-ledger account, when the recipient has one. Absent means the
    /// payment must go through a relay escrow.
    pub account_id: Option<AccountId>,
    /// The assertion a relay payment is claimable by.
    pub assertion: String,
}

impl ResolvedRecipient {
    /// Whether the recipient can receive a direct payment.
    pub fn is_direct(&self) -> bool {
        self.account_id.is_some()
    }
}

/// Resolves recipient identifiers to users and accounts.
#[async_trait::async_trait]
pub trait RecipientResolver: Send + Sync {
    /// Resolve a recipient identifier. Errors are logged by the caller and
    /// surfaced to the user as an opaque lookup failure.
    async fn resolve(&self, input: &str) -> Result<ResolvedRecipient>;
}
