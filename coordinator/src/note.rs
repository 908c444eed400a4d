//! Payment note encryption.

use serde::{Deserialize, Serialize};

use lumenbatch_common::{BatchError, Result, TransactionId, Username};

/// Plaintext note contents, bound to the transaction they ride on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteContents {
    /// The message the sender attached to the payment.
    pub note: String,
    /// The transaction the note belongs to.
    pub tx_id: TransactionId,
}

/// Encrypts payment notes for their recipients.
#[async_trait::async_trait]
pub trait NoteEncryptor: Send + Sync {
    /// Seal a note for the recipient. `recipient` is absent when the
    /// resolved target is an account with no known user.
    async fn encrypt(&self, note: &NoteContents, recipient: Option<&Username>) -> Result<String>;
}

/// Note encryptor sealing with a key derived from the recipient username.
///
/// Stands in for a directory-backed key exchange; real deployments provide
/// their own [`NoteEncryptor`] over the user key infrastructure.
pub struct SealedNoteEncryptor;

const NOTE_KEY_SALT: &[u8] = b"lumenbatch-note";
const NOTE_KEY_INFO: &[u8] = b"payment note key";

#[async_trait::async_trait]
impl NoteEncryptor for SealedNoteEncryptor {
    async fn encrypt(&self, note: &NoteContents, recipient: Option<&Username>) -> Result<String> {
        let holder = recipient.map(|u| u.as_str()).unwrap_or("");
        let key = lumenbatch_crypto::derive_key(holder.as_bytes(), NOTE_KEY_SALT, NOTE_KEY_INFO)
            .map_err(|e| BatchError::NoteEncryption(e.to_string()))?;

        let sealed = lumenbatch_crypto::seal(
            &key,
            note.note.as_bytes(),
            note.tx_id.as_str().as_bytes(),
        )
        .map_err(|e| BatchError::NoteEncryption(e.to_string()))?;

        serde_json::to_string(&sealed).map_err(|e| BatchError::NoteEncryption(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seal_note_round_trip() {
        let encryptor = SealedNoteEncryptor;
        let note = NoteContents {
            note: "thanks for lunch".to_string(),
            tx_id: TransactionId::new("deadbeef"),
        };
        let recipient = Username::new("alice");

        let blob = encryptor.encrypt(&note, Some(&recipient)).await.unwrap();

        let key = lumenbatch_crypto::derive_key(b"alice", NOTE_KEY_SALT, NOTE_KEY_INFO).unwrap();
        let sealed: lumenbatch_crypto::SealedBox = serde_json::from_str(&blob).unwrap();
        let plaintext = lumenbatch_crypto::open(&key, &sealed, b"deadbeef").unwrap();

        assert_eq!(plaintext, b"thanks for lunch");
    }

    #[tokio::test]
    async fn test_note_bound_to_transaction() {
        let encryptor = SealedNoteEncryptor;
        let note = NoteContents {
            note: "hi".to_string(),
            tx_id: TransactionId::new("tx-a"),
        };

        let blob = encryptor.encrypt(&note, None).await.unwrap();

        let key = lumenbatch_crypto::derive_key(b"", NOTE_KEY_SALT, NOTE_KEY_INFO).unwrap();
        let sealed: lumenbatch_crypto::SealedBox = serde_json::from_str(&blob).unwrap();
        assert!(lumenbatch_crypto::open(&key, &sealed, b"tx-b").is_err());
    }
}
