//! AES-256-GCM authenticated encryption of note content.
//!
//! Each encryption draws a fresh random salt and nonce, so two encryptions
//! of the same plaintext under the same security code never produce the
//! same blob.

use crate::crypto::blob::EncryptedBlob;
use crate::crypto::kdf::{derive_key, KdfParams, SALT_LEN};
use crate::crypto::{CryptoError, Result};
use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use rand::RngCore;

/// Encrypt note content with a key derived from the security code.
///
/// # Arguments
/// * `plaintext` - The note content
/// * `security_code` - The user's secret
/// * `params` - KDF work-factor parameters
///
/// # Returns
/// A self-contained [`EncryptedBlob`] carrying salt, nonce, and ciphertext
/// with the authentication tag appended.
///
/// # Security Notes
/// - Salt and nonce are drawn from the OS RNG on every call
/// - AES-256-GCM provides both confidentiality and integrity
pub fn encrypt_note(
    plaintext: &str,
    security_code: &str,
    params: &KdfParams,
) -> Result<EncryptedBlob> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let key = derive_key(security_code, &salt, params)?;
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let nonce_bytes: [u8; 12] = nonce.into();

    let ciphertext = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(format!("{}", e)))?;

    Ok(EncryptedBlob {
        salt,
        nonce: nonce_bytes,
        ciphertext,
    })
}

/// Decrypt a base64-encoded blob with the security code.
///
/// Fails with [`CryptoError::DecryptionFailed`] when authentication fails.
/// A wrong security code and a corrupted or tampered blob are deliberately
/// indistinguishable to avoid oracle leakage.
pub fn decrypt_note(encoded: &str, security_code: &str, params: &KdfParams) -> Result<String> {
    let blob = EncryptedBlob::from_base64(encoded).map_err(|_| CryptoError::DecryptionFailed)?;

    let key = derive_key(security_code, &blob.salt, params)?;
    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let nonce = Nonce::from(blob.nonce);

    let plaintext = cipher
        .decrypt(&nonce, blob.ciphertext.as_slice())
        .map_err(|_| CryptoError::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params() -> KdfParams {
        KdfParams { iterations: 10_000 }
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let params = test_params();
        let encrypted = encrypt_note("Dear diary,\nnothing happened.", "hunter2", &params).unwrap();
        let decrypted = decrypt_note(&encrypted.to_base64(), "hunter2", &params).unwrap();

        assert_eq!(decrypted, "Dear diary,\nnothing happened.");
    }

    #[test]
    fn test_empty_note_roundtrip() {
        let params = test_params();
        let encrypted = encrypt_note("", "hunter2", &params).unwrap();
        let decrypted = decrypt_note(&encrypted.to_base64(), "hunter2", &params).unwrap();

        assert_eq!(decrypted, "");
    }

    #[test]
    fn test_wrong_code_fails() {
        let params = test_params();
        let encrypted = encrypt_note("secret", "correct-code", &params).unwrap();

        let result = decrypt_note(&encrypted.to_base64(), "wrong-code", &params);
        assert!(matches!(result, Err(CryptoError::DecryptionFailed)));
    }

    #[test]
    fn test_fresh_salt_and_nonce() {
        let params = test_params();
        let b1 = encrypt_note("same note", "same code", &params).unwrap();
        let b2 = encrypt_note("same note", "same code", &params).unwrap();

        assert_ne!(b1.salt, b2.salt);
        assert_ne!(b1.nonce, b2.nonce);
        assert_ne!(b1.to_base64(), b2.to_base64());

        // Both still decrypt to the same plaintext.
        assert_eq!(
            decrypt_note(&b1.to_base64(), "same code", &params).unwrap(),
            decrypt_note(&b2.to_base64(), "same code", &params).unwrap()
        );
    }

    #[test]
    fn test_tampering_detected() {
        let params = test_params();
        let mut blob = encrypt_note("original", "code", &params).unwrap();
        blob.ciphertext[0] ^= 0xFF;

        let result = decrypt_note(&blob.to_base64(), "code", &params);
        assert!(matches!(result, Err(CryptoError::DecryptionFailed)));
    }

    #[test]
    fn test_garbage_blob_fails_like_wrong_code() {
        let params = test_params();
        let result = decrypt_note("definitely not a blob", "code", &params);
        assert!(matches!(result, Err(CryptoError::DecryptionFailed)));
    }
}
