//! Storage row types.

/// A vault record as stored: one per sync identifier.
#[derive(Debug, Clone)]
pub struct StoredVault {
    pub sync_id: String,
    /// Opaque base64 ciphertext; the server cannot read it.
    pub encrypted_blob: String,
    /// Ownership fingerprint presented on the first accepted push.
    pub fingerprint: String,
    /// RFC 3339 timestamp of the last accepted write.
    pub last_updated: String,
}
