//! Transaction construction and signing.
//!
//! Envelopes are canonical pipe-delimited payloads signed with the sender
//! seed. The transaction ID is the SHA-256 of the payload, so signing is
//! fully deterministic for a given seed, destination, amount, and seqno.

use lumenbatch_common::{AccountId, Amount, Result, Seqno, TransactionId};
use lumenbatch_crypto::{hex, sha256_hex, PublicKey, Seed};

use crate::seqno::SeqnoProvider;

/// A signed transaction envelope with its assigned seqno and hash.
#[derive(Debug, Clone)]
pub struct SignResult {
    /// The signed envelope, ready for submission.
    pub signed: String,
    /// The sequence number consumed by this transaction.
    pub seqno: Seqno,
    /// The transaction hash.
    pub tx_id: TransactionId,
}

/// Derive the on-ledger account ID for a public key.
pub fn account_id_for(public: &PublicKey) -> AccountId {
    AccountId::new(format!("G{}", hex::encode(&public.to_bytes()).to_uppercase()))
}

/// Sign a PAY transaction to an existing funded account.
pub async fn sign_payment(
    seed: &Seed,
    to: &AccountId,
    amount: &Amount,
    memo: &str,
    sp: &SeqnoProvider,
) -> Result<SignResult> {
    sign_envelope("PAY", seed, to, amount, memo, sp).await
}

/// Sign a CREATE_ACCOUNT transaction to an unfunded account.
pub async fn sign_create_account(
    seed: &Seed,
    to: &AccountId,
    amount: &Amount,
    memo: &str,
    sp: &SeqnoProvider,
) -> Result<SignResult> {
    sign_envelope("CREATE_ACCOUNT", seed, to, amount, memo, sp).await
}

async fn sign_envelope(
    op: &str,
    seed: &Seed,
    to: &AccountId,
    amount: &Amount,
    memo: &str,
    sp: &SeqnoProvider,
) -> Result<SignResult> {
    let seqno = sp.next().await?;
    let from = account_id_for(&seed.public_key());

    let payload = format!("{op}|{from}|{to}|{amount}|{seqno}|{memo}");
    let tx_id = TransactionId::new(sha256_hex(payload.as_bytes()));
    let signature = seed.sign(payload.as_bytes());
    let signed = format!("{}.{}", hex::encode(payload.as_bytes()), signature.to_hex());

    Ok(SignResult {
        signed,
        seqno,
        tx_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use lumenbatch_common::BatchError;

    use crate::gateway::LedgerGateway;
    use crate::types::{DirectPost, RelayPost, SubmitResult};

    struct StaticGateway;

    #[async_trait::async_trait]
    impl LedgerGateway for StaticGateway {
        async fn account_seqno(&self, _account: &AccountId) -> Result<Seqno> {
            Ok(Seqno::new(41))
        }

        async fn is_account_funded(&self, _account: &AccountId) -> Result<bool> {
            Ok(true)
        }

        async fn submit_payment(&self, _post: DirectPost) -> Result<SubmitResult> {
            Err(BatchError::Submit("not used".to_string()))
        }

        async fn submit_relay_payment(&self, _post: RelayPost) -> Result<SubmitResult> {
            Err(BatchError::Submit("not used".to_string()))
        }

        async fn add_pending_tx(
            &self,
            _account: &AccountId,
            _tx_id: &TransactionId,
            _seqno: Seqno,
        ) -> Result<()> {
            Ok(())
        }
    }

    fn test_provider(seed: &Seed) -> SeqnoProvider {
        SeqnoProvider::new(
            Arc::new(StaticGateway),
            account_id_for(&seed.public_key()),
        )
    }

    #[tokio::test]
    async fn test_sign_payment_consumes_seqno() {
        let seed = Seed::generate();
        let sp = test_provider(&seed);
        let to = AccountId::new("GRECIPIENT");
        let amount = Amount::parse("5").unwrap();

        let first = sign_payment(&seed, &to, &amount, "", &sp).await.unwrap();
        let second = sign_payment(&seed, &to, &amount, "", &sp).await.unwrap();

        assert_eq!(first.seqno, Seqno::new(42));
        assert_eq!(second.seqno, Seqno::new(43));
        // distinct seqnos give distinct hashes for otherwise equal payments
        assert_ne!(first.tx_id, second.tx_id);
    }

    #[tokio::test]
    async fn test_create_account_differs_from_payment() {
        let seed = Seed::generate();
        let to = AccountId::new("GRECIPIENT");
        let amount = Amount::parse("1").unwrap();

        let pay = sign_payment(&seed, &to, &amount, "", &test_provider(&seed))
            .await
            .unwrap();
        let create = sign_create_account(&seed, &to, &amount, "", &test_provider(&seed))
            .await
            .unwrap();

        assert_ne!(pay.tx_id, create.tx_id);
    }

    #[tokio::test]
    async fn test_envelope_verifies() {
        let seed = Seed::generate();
        let sp = test_provider(&seed);
        let amount = Amount::parse("2.5").unwrap();

        let result = sign_payment(&seed, &AccountId::new("GDST"), &amount, "memo", &sp)
            .await
            .unwrap();

        let (payload_hex, sig_hex) = result.signed.split_once('.').unwrap();
        let payload = hex::decode(payload_hex).unwrap();
        let signature = lumenbatch_crypto::Signature::from_hex(sig_hex).unwrap();
        assert!(seed.public_key().verify(&payload, &signature).is_ok());
    }

    #[test]
    fn test_account_id_format() {
        let seed = Seed::generate();
        let id = account_id_for(&seed.public_key());
        assert!(id.is_valid());
        assert_eq!(id.as_str().len(), 65);
    }
}
