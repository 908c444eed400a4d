//! Simulated recipient directory, wallet, and chat.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::info;

use lumenbatch_common::{AccountId, BatchError, Result, TransactionId, Username};
use lumenbatch_crypto::Seed;
use lumenbatch_ledger::account_id_for;

use lumenbatch_coordinator::chat::ChatSender;
use lumenbatch_coordinator::resolver::{RecipientResolver, ResolvedRecipient};
use lumenbatch_coordinator::wallet::{SenderAccount, SenderKeyProvider};

/// A directory of simulated users.
#[derive(Default)]
pub struct SimulatedDirectory {
    entries: HashMap<String, Option<AccountId>>,
}

impl SimulatedDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with an on-ledger account. Returns the account so
    /// the caller can fund it.
    pub fn add_direct(&mut self, name: &str) -> AccountId {
        let account = account_id_for(&Seed::generate().public_key());
        self.entries.insert(name.to_string(), Some(account.clone()));
        account
    }

    /// Register a relay-only user (no on-ledger account).
    pub fn add_relay(&mut self, name: &str) {
        self.entries.insert(name.to_string(), None);
    }
}

#[async_trait::async_trait]
impl RecipientResolver for SimulatedDirectory {
    async fn resolve(&self, input: &str) -> Result<ResolvedRecipient> {
        let account = self
            .entries
            .get(input)
            .ok_or_else(|| BatchError::Gateway(format!("no directory entry for {input}")))?;

        Ok(ResolvedRecipient {
            username: Username::new(input),
            account_id: account.clone(),
            assertion: input.to_string(),
        })
    }
}

/// Wallet with one generated sender account.
pub struct SimulatedWallet {
    sender: SenderAccount,
}

impl SimulatedWallet {
    pub fn new() -> Self {
        let seed = Seed::generate();
        let account_id = account_id_for(&seed.public_key());
        Self {
            sender: SenderAccount {
                account_id,
                seed: Arc::new(seed),
            },
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.sender.account_id.clone()
    }
}

impl Default for SimulatedWallet {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SenderKeyProvider for SimulatedWallet {
    async fn lookup_sender(&self) -> Result<SenderAccount> {
        Ok(self.sender.clone())
    }
}

/// Chat sender that records receipts and logs them.
#[derive(Default)]
pub struct RecordingChat {
    sent: Mutex<Vec<(Username, TransactionId)>>,
}

impl RecordingChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl ChatSender for RecordingChat {
    async fn send_payment_message(
        &self,
        recipient: &Username,
        tx_id: &TransactionId,
    ) -> Result<()> {
        info!(recipient = %recipient, tx_id = %tx_id, "chat receipt delivered");
        self.sent
            .lock()
            .unwrap()
            .push((recipient.clone(), tx_id.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_directory_resolution() {
        let mut directory = SimulatedDirectory::new();
        let account = directory.add_direct("alice");
        directory.add_relay("bob@rooter");

        let alice = directory.resolve("alice").await.unwrap();
        assert_eq!(alice.account_id, Some(account));
        assert!(alice.is_direct());

        let bob = directory.resolve("bob@rooter").await.unwrap();
        assert!(!bob.is_direct());

        assert!(directory.resolve("nobody").await.is_err());
    }

    #[tokio::test]
    async fn test_wallet_lookup() {
        let wallet = SimulatedWallet::new();
        let sender = wallet.lookup_sender().await.unwrap();
        assert!(sender.account_id.is_valid());
    }
}
