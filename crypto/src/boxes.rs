//! Sealed boxes for payment notes and relay escrows.
//!
//! AES-256-GCM with the associated data binding the box to its transaction,
//! so a note cannot be replayed against a different payment.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::{CryptoError, Result};

/// Encrypted payload with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedBox {
    /// Algorithm identifier.
    pub algorithm: String,
    /// Nonce (12 bytes for AES-GCM).
    pub nonce: Vec<u8>,
    /// Ciphertext.
    pub ciphertext: Vec<u8>,
}

/// Seal plaintext using AES-256-GCM.
///
/// # Arguments
/// * `key` - 32-byte encryption key
/// * `plaintext` - Data to encrypt
/// * `aad` - Additional authenticated data (not encrypted, but bound to the box)
pub fn seal(key: &[u8; 32], plaintext: &[u8], aad: &[u8]) -> Result<SealedBox> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    // Generate random nonce
    let mut nonce_bytes = [0u8; 12];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    Ok(SealedBox {
        algorithm: "AES-256-GCM".to_string(),
        nonce: nonce_bytes.to_vec(),
        ciphertext,
    })
}

/// Open a sealed box. The associated data must match what was sealed.
pub fn open(key: &[u8; 32], sealed: &SealedBox, aad: &[u8]) -> Result<Vec<u8>> {
    if sealed.algorithm != "AES-256-GCM" {
        return Err(CryptoError::DecryptionFailed(format!(
            "Unsupported algorithm: {}",
            sealed.algorithm
        )));
    }

    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;

    let nonce_bytes: [u8; 12] = sealed
        .nonce
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::DecryptionFailed("Invalid nonce length".to_string()))?;

    let nonce = Nonce::from_slice(&nonce_bytes);

    cipher
        .decrypt(
            nonce,
            Payload {
                msg: sealed.ciphertext.as_slice(),
                aad,
            },
        )
        .map_err(|_| CryptoError::DecryptionFailed("Decryption failed".to_string()))
}

/// Derive an encryption key using HKDF-SHA256.
pub fn derive_key(secret: &[u8], salt: &[u8], info: &[u8]) -> Result<[u8; 32]> {
    use hkdf::Hkdf;
    use sha2::Sha256;

    let hk = Hkdf::<Sha256>::new(Some(salt), secret);
    let mut key = [0u8; 32];
    hk.expand(info, &mut key)
        .map_err(|e| CryptoError::KeyDerivationFailed(e.to_string()))?;

    Ok(key)
}
