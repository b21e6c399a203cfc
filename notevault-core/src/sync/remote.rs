//! The remote persistence collaborator, as seen from the client.
//!
//! The coordinator only ever talks to this trait; tests inject an
//! in-memory implementation, production uses the HTTP client.

use crate::sync::models::NoteRecord;
use async_trait::async_trait;

/// Outcome of fetching a vault record.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Record exists and the presented fingerprint matches.
    Found(NoteRecord),
    /// Record exists but is owned by a different fingerprint.
    Forbidden,
    /// No record for this identifier.
    Missing,
}

/// Outcome of pushing a blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Record created or overwritten.
    Accepted,
    /// Record exists under a different fingerprint; nothing was written.
    Forbidden,
}

/// Outcome of deleting a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// Record exists under a different fingerprint; nothing was removed.
    Forbidden,
    /// No record for this identifier.
    Missing,
}

/// Failures that prevent the remote from answering at all. Both fold into
/// the offline-degradation path; they are kept apart only so status can
/// distinguish "network down" from "server storage failing".
#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoteError {
    #[error("Remote unreachable: {0}")]
    Unreachable(String),

    #[error("Remote storage fault: {0}")]
    Storage(String),
}

/// Remote vault store keyed by sync identifier. Every call presents the
/// ownership fingerprint; the store never sees the security code.
#[async_trait]
pub trait RemoteVault: Send + Sync {
    async fn fetch(
        &self,
        sync_id: &str,
        fingerprint: &str,
    ) -> std::result::Result<FetchOutcome, RemoteError>;

    async fn push(
        &self,
        sync_id: &str,
        blob: &str,
        fingerprint: &str,
    ) -> std::result::Result<PushOutcome, RemoteError>;

    async fn delete(
        &self,
        sync_id: &str,
        fingerprint: &str,
    ) -> std::result::Result<RemoveOutcome, RemoteError>;
}
