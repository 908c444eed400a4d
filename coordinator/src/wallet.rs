//! Sender credential lookup.

use std::sync::Arc;

use lumenbatch_common::{AccountId, Result};
use lumenbatch_crypto::Seed;

/// The sender's account and signing seed.
#[derive(Clone)]
pub struct SenderAccount {
    /// The sender's on-ledger account.
    pub account_id: AccountId,
    /// Seed used to sign every transaction in the batch. Shared across the
    /// concurrent preparation tasks.
    pub seed: Arc<Seed>,
}

/// Looks up the sender's account and seed from the wallet's credential
/// store. Failure here aborts the whole batch.
#[async_trait::async_trait]
pub trait SenderKeyProvider: Send + Sync {
    /// Resolve the sender's account and signing seed.
    async fn lookup_sender(&self) -> Result<SenderAccount>;
}
