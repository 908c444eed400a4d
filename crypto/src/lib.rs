//! Lumenbatch Cryptographic Primitives
//!
//! Account keys and transaction signatures (Ed25519), sealed boxes for
//! payment notes and relay escrows (AES-256-GCM with HKDF key derivation),
//! and transaction hashing.

pub mod boxes;
pub mod hash;
pub mod hex;
pub mod keys;

pub use boxes::{derive_key, open, seal, SealedBox};
pub use hash::{sha256, sha256_hex};
pub use keys::{PublicKey, Seed, Signature};

/// Errors from cryptographic operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
