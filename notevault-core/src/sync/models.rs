//! Wire and status types shared between the coordinator and the remote
//! vault collaborator.

use serde::{Deserialize, Serialize};

/// Header carrying the ownership fingerprint on GET and DELETE requests.
pub const VAULT_HASH_HEADER: &str = "x-vault-hash";

/// A vault record as returned by `GET /api/notes/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    /// Base64 encrypted blob.
    pub encrypted_content: String,

    /// Ownership fingerprint stored with the record.
    pub hash: String,

    /// RFC 3339 timestamp of the last accepted write.
    pub last_updated: String,
}

/// Body of `POST /api/notes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub sync_id: String,
    pub encrypted_content: String,
    pub hash: String,
}

/// Connectivity as last observed by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// Remote store reachable and healthy.
    Online,
    /// Remote store unreachable or timing out.
    Offline,
    /// Remote store reachable but its persistence layer is failing.
    Degraded,
}

/// Where the blob used to unlock the session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockSource {
    /// Remote record fetched and decrypted.
    Remote,
    /// Remote had nothing usable; the local mirror supplied the blob.
    LocalMirror,
    /// Neither side had a blob: a brand-new empty vault.
    Fresh,
}

/// Result of a successful unlock.
#[derive(Debug, Clone)]
pub struct UnlockReport {
    pub plaintext: String,
    pub connectivity: Connectivity,
    pub source: UnlockSource,
}

/// Tagged outcome of a save. The local mirror has been written in every
/// variant except `Unchanged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Content matched the last known plaintext; nothing was written.
    Unchanged,
    /// Local write and remote push both succeeded.
    Synced,
    /// Remote rejected the push: the identifier is locked to another code.
    /// The local copy is retained; connectivity is unaffected.
    Conflict,
    /// Remote was unreachable or failing; the local copy is authoritative.
    SavedLocally(Connectivity),
}

/// Tagged outcome of a vault deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Remote record and local mirror removed; session locked.
    Deleted,
    /// Remote refused: fingerprint mismatch. Nothing was removed and the
    /// session stays unlocked.
    Conflict,
    /// Remote could not be reached; deletion requires connectivity, so
    /// nothing was removed.
    Unavailable(Connectivity),
}
