//! Cryptographic engine for the encrypted notepad.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 key derivation from the security code
//! - AES-256-GCM authenticated encryption of note content
//! - The self-contained encrypted blob encoding (salt, nonce, ciphertext)
//! - SHA-256 ownership fingerprints

pub mod blob;
pub mod cipher;
pub mod fingerprint;
pub mod kdf;

pub use blob::EncryptedBlob;
pub use cipher::{decrypt_note, encrypt_note};
pub use fingerprint::{fingerprint, ownership_fingerprint};
pub use kdf::{derive_key, DerivedKey, KdfParams};

use thiserror::Error;

/// Errors that can occur in cryptographic operations
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Key derivation failed: {0}")]
    KdfFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Covers wrong security code, corruption, and tampering alike. The
    /// variants are deliberately not distinguishable from the message.
    #[error("Decryption failed: wrong security code or corrupted data")]
    DecryptionFailed,

    #[error("Invalid encrypted blob: {0}")]
    InvalidBlob(String),
}

/// Result type for crypto operations
pub type Result<T> = std::result::Result<T, CryptoError>;
