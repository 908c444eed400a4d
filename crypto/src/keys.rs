//! Account keys and transaction signatures using Ed25519.

use ed25519_dalek::{
    Signer, SigningKey as Ed25519SigningKey, Verifier, VerifyingKey as Ed25519VerifyingKey,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::hex;
use crate::{CryptoError, Result};

/// An account seed (private signing key). Signs transaction envelopes; the
/// derived public key identifies the account on the ledger.
#[derive(Clone)]
pub struct Seed {
    inner: Ed25519SigningKey,
}

impl Seed {
    /// Generate a new random seed. Used for ephemeral relay escrow accounts.
    pub fn generate() -> Self {
        let mut csprng = OsRng;
        Self {
            inner: Ed25519SigningKey::generate(&mut csprng),
        }
    }

    /// Create from raw seed bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKey("Invalid seed length".to_string()))?;

        Ok(Self {
            inner: Ed25519SigningKey::from_bytes(&bytes),
        })
    }

    /// Get the corresponding public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: self.inner.verifying_key(),
        }
    }

    /// Sign a message. Ed25519 signatures are deterministic for a given
    /// seed and message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        let sig = self.inner.sign(message);
        Signature {
            bytes: sig.to_bytes().to_vec(),
        }
    }

    /// Get raw seed bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes()
    }
}

/// An account public key.
#[derive(Clone)]
pub struct PublicKey {
    inner: Ed25519VerifyingKey,
}

impl PublicKey {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKey("Invalid key length".to_string()))?;

        let inner = Ed25519VerifyingKey::from_bytes(&bytes)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;

        Ok(Self { inner })
    }

    /// Verify a signature.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<()> {
        let sig_bytes: [u8; 64] = signature
            .bytes
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidSignature)?;

        let sig = ed25519_dalek::Signature::from_bytes(&sig_bytes);

        self.inner
            .verify(message, &sig)
            .map_err(|_| CryptoError::InvalidSignature)
    }

    /// Get raw key bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes()
    }
}

/// A transaction signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signature {
    /// Raw signature bytes.
    pub bytes: Vec<u8>,
}

impl Signature {
    /// Get signature as hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Create from hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str).ok_or(CryptoError::InvalidSignature)?;
        Ok(Self { bytes })
    }
}
