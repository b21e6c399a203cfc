//! PBKDF2-HMAC-SHA256 key derivation from the security code.
//!
//! Parameters:
//! - 100,000 iterations by default
//! - 16 byte salt (carried inside the encrypted blob)
//! - 32 byte (256 bit) output key
//!
//! The iteration count is not encoded in the blob, so every implementation
//! that reads or writes NoteVault blobs must agree on it.

use crate::crypto::{CryptoError, Result};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroize;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Work-factor parameters for key derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// PBKDF2 iteration count.
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl KdfParams {
    /// Verify that parameters are within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        if self.iterations < 10_000 {
            return Err(CryptoError::KdfFailed(
                "Iteration count too low (minimum: 10,000)".to_string(),
            ));
        }
        Ok(())
    }
}

/// A derived 256-bit symmetric key, zeroized on drop.
pub struct DerivedKey {
    key: [u8; 32],
}

impl DerivedKey {
    /// Get the raw key bytes (use sparingly)
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// Derive a symmetric key from a security code and salt.
///
/// Deterministic: the same `(security_code, salt)` pair always yields the
/// same key. Changing either input changes the key unpredictably.
///
/// # Arguments
/// * `security_code` - The user's low-entropy secret
/// * `salt` - Random salt drawn fresh for every encryption
/// * `params` - Work-factor parameters
pub fn derive_key(security_code: &str, salt: &[u8; SALT_LEN], params: &KdfParams) -> Result<DerivedKey> {
    params.validate()?;

    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(security_code.as_bytes(), salt, params.iterations, &mut key);

    Ok(DerivedKey { key })
}
