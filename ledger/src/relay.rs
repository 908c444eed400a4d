//! Relay escrow construction.
//!
//! A relay payment funds an ephemeral escrow account whose seed is sealed
//! for the intended recipient, used when the recipient has no on-ledger
//! account yet. Claiming the escrow is out of scope here; this module only
//! builds the funding side.

use serde::{Deserialize, Serialize};

use lumenbatch_common::{AccountId, Amount, BatchError, Result, TeamId};
use lumenbatch_crypto::{derive_key, hex, seal, sha256, Seed};

use crate::seqno::SeqnoProvider;
use crate::txbuild::{account_id_for, sign_create_account, SignResult};

const RELAY_KEY_SALT: &[u8] = b"lumenbatch-relay";
const RELAY_KEY_INFO: &[u8] = b"relay escrow key";

/// Inputs for building a relay payment.
pub struct RelayInput<'a> {
    /// Sender seed, pays for the escrow.
    pub from: &'a Seed,
    /// Amount to place in escrow.
    pub amount: &'a Amount,
    /// Optional plaintext note for the recipient.
    pub note: Option<&'a str>,
    /// Key the escrow box is sealed for, from [`relay_key`].
    pub encrypt_for: [u8; 32],
    /// Shared sequence provider for the funding transaction.
    pub sp: &'a SeqnoProvider,
}

/// A fully constructed relay payment.
pub struct Relay {
    /// The ephemeral escrow account.
    pub relay_account: AccountId,
    /// Signed funding transaction from the sender to the escrow.
    pub fund_tx: SignResult,
    /// Sealed box holding the escrow seed, amount, and note.
    pub box_blob: String,
}

/// What the recipient finds inside the sealed relay box.
#[derive(Debug, Serialize, Deserialize)]
struct RelayBoxContents {
    /// Hex-encoded escrow seed.
    relay_seed: String,
    /// Escrowed amount as a decimal string.
    amount: String,
    /// Plaintext note, if any.
    note: Option<String>,
}

/// Derive the sealing key and escrow team for a recipient assertion.
///
/// The derivation is deterministic so the recipient's client can re-derive
/// the key from the same assertion when claiming.
pub fn relay_key(assertion: &str) -> Result<([u8; 32], TeamId)> {
    let key = derive_key(assertion.as_bytes(), RELAY_KEY_SALT, RELAY_KEY_INFO)
        .map_err(|e| BatchError::Relay(e.to_string()))?;
    let team_id = TeamId::new(hex::encode(&sha256(assertion.as_bytes())[..16]));
    Ok((key, team_id))
}

/// Build a relay payment: generate the escrow account, seal the claim box,
/// and sign the funding transaction.
///
/// The box is sealed before the funding transaction is signed so a sealing
/// failure does not waste a sequence number.
pub async fn create(input: RelayInput<'_>) -> Result<Relay> {
    let escrow = Seed::generate();
    let relay_account = account_id_for(&escrow.public_key());

    let contents = RelayBoxContents {
        relay_seed: hex::encode(&escrow.to_bytes()),
        amount: input.amount.to_string(),
        note: input.note.map(|n| n.to_string()),
    };
    let plaintext =
        serde_json::to_vec(&contents).map_err(|e| BatchError::Relay(e.to_string()))?;
    let sealed = seal(&input.encrypt_for, &plaintext, relay_account.as_str().as_bytes())
        .map_err(|e| BatchError::Relay(e.to_string()))?;
    let box_blob = serde_json::to_string(&sealed).map_err(|e| BatchError::Relay(e.to_string()))?;

    let fund_tx = sign_create_account(input.from, &relay_account, input.amount, "", input.sp).await?;

    Ok(Relay {
        relay_account,
        fund_tx,
        box_blob,
    })
}
