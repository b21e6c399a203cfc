//! The self-contained encrypted blob encoding.
//!
//! Wire/storage format: `base64( salt (16) || nonce (12) || ciphertext+tag )`.
//! The format must round-trip exactly across implementations; decryption
//! needs only the blob and the security code.

use crate::crypto::kdf::SALT_LEN;
use crate::crypto::{CryptoError, Result};
use base64::Engine;

/// Nonce length in bytes (AES-GCM standard 96 bits).
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// A decoded encrypted blob: salt, nonce, and ciphertext with the
/// authentication tag still appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

impl EncryptedBlob {
    /// Encode as the transportable base64 string.
    pub fn to_base64(&self) -> String {
        let mut combined = Vec::with_capacity(SALT_LEN + NONCE_LEN + self.ciphertext.len());
        combined.extend_from_slice(&self.salt);
        combined.extend_from_slice(&self.nonce);
        combined.extend_from_slice(&self.ciphertext);
        base64::engine::general_purpose::STANDARD.encode(combined)
    }

    /// Decode from the transportable base64 string.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let data = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| CryptoError::InvalidBlob(format!("Invalid base64: {}", e)))?;

        // The ciphertext of an empty plaintext is just the tag.
        if data.len() < SALT_LEN + NONCE_LEN + TAG_LEN {
            return Err(CryptoError::InvalidBlob(format!(
                "Blob too short: {} bytes",
                data.len()
            )));
        }

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&data[..SALT_LEN]);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&data[SALT_LEN..SALT_LEN + NONCE_LEN]);

        Ok(Self {
            salt,
            nonce,
            ciphertext: data[SALT_LEN + NONCE_LEN..].to_vec(),
        })
    }
}
