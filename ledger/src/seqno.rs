//! Shared sequence number provider.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use lumenbatch_common::{AccountId, Result, Seqno};

use crate::gateway::LedgerGateway;

/// Allocates strictly increasing sequence numbers for one sender account.
///
/// The first call queries the account's current on-ledger seqno through the
/// gateway; every call, across any number of concurrent tasks, receives a
/// distinct value one past the previous. If the initial query fails the
/// call fails and no state is retained, so a later call retries the query.
pub struct SeqnoProvider {
    gateway: Arc<dyn LedgerGateway>,
    account: AccountId,
    last: Mutex<Option<Seqno>>,
}

impl SeqnoProvider {
    /// Create a provider for the given sender account.
    pub fn new(gateway: Arc<dyn LedgerGateway>, account: AccountId) -> Self {
        Self {
            gateway,
            account,
            last: Mutex::new(None),
        }
    }

    /// Allocate the next sequence number.
    pub async fn next(&self) -> Result<Seqno> {
        let mut last = self.last.lock().await;

        let allocated = match *last {
            Some(seqno) => seqno.next(),
            None => {
                let base = self.gateway.account_seqno(&self.account).await?;
                debug!(account = %self.account, base = %base, "seqno provider initialized");
                base.next()
            }
        };

        *last = Some(allocated);
        Ok(allocated)
    }
}
