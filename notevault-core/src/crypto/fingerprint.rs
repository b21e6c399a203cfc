//! Ownership fingerprints.
//!
//! The fingerprint of `sync identifier + security code` is sent to the
//! remote store as a bearer credential: it proves knowledge of the security
//! code for an identifier without revealing the code. The store compares
//! fingerprints for equality and gains no capability to decrypt.
//!
//! Known latent weakness, inherited from the original design: the
//! fingerprint carries no server-side secret or per-identifier salt, so an
//! attacker who learns one can mount an offline guessing attack on the
//! security code. Strengthening this would break cross-device unlock, so
//! it is flagged here rather than changed.

use sha2::{Digest, Sha256};

/// One-way hash of arbitrary text, as a lowercase hex digest.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// The ownership token for a vault: `fingerprint(identifier || code)`.
pub fn ownership_fingerprint(sync_id: &str, security_code: &str) -> String {
    fingerprint(&format!("{}{}", sync_id, security_code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        assert_eq!(fingerprint("alphacode"), fingerprint("alphacode"));
    }

    #[test]
    fn test_fingerprint_known_vector() {
        // SHA-256("abc"), to pin the digest and hex encoding.
        assert_eq!(
            fingerprint("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_different_codes_diverge() {
        assert_ne!(
            ownership_fingerprint("alpha", "code-one"),
            ownership_fingerprint("alpha", "code-two")
        );
    }

    #[test]
    fn test_matches_concatenation() {
        assert_eq!(
            ownership_fingerprint("alpha", "secret"),
            fingerprint("alphasecret")
        );
    }
}
