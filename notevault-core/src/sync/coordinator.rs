//! The sync coordinator: decides, for every operation, whether to trust
//! local storage, remote storage, or surface a user-facing failure.
//!
//! Session lifecycle: `Locked -> Unlocking -> Unlocked -> (Saving <->
//! Unlocked) -> Locked`, with deletion reachable only from `Unlocked`.
//! The session is an explicit value owned by the coordinator; there is no
//! ambient global state, and `lock()` wipes it unconditionally.

use crate::crypto::{decrypt_note, encrypt_note, ownership_fingerprint, KdfParams};
use crate::sync::mirror::MirrorStore;
use crate::sync::models::{
    Connectivity, DeleteOutcome, SaveOutcome, UnlockReport, UnlockSource,
};
use crate::sync::remote::{FetchOutcome, PushOutcome, RemoteError, RemoteVault, RemoveOutcome};
use crate::sync::{Result, SyncError};
use std::sync::Arc;
use zeroize::Zeroize;

/// Secrets and baseline for an unlocked vault. Held only while unlocked;
/// wiped on lock.
struct Session {
    sync_id: String,
    security_code: String,
    fingerprint: String,
    /// Dirty-check baseline: a save is skipped when content equals this.
    last_known_plaintext: String,
    connectivity: Connectivity,
}

impl Drop for Session {
    fn drop(&mut self) {
        self.security_code.zeroize();
        self.last_known_plaintext.zeroize();
    }
}

/// Orchestrates unlock, save, lock, and vault deletion against the local
/// mirror and the remote vault store.
///
/// Taking `&mut self` on every operation keeps at most one save logically
/// in flight per session; a superseding save simply wins.
pub struct SyncCoordinator {
    remote: Arc<dyn RemoteVault>,
    mirror: MirrorStore,
    kdf: KdfParams,
    session: Option<Session>,
}

impl SyncCoordinator {
    /// Create a locked coordinator over the given collaborators.
    pub fn new(remote: Arc<dyn RemoteVault>, mirror: MirrorStore) -> Self {
        Self::with_kdf_params(remote, mirror, KdfParams::default())
    }

    /// Create a locked coordinator with explicit KDF work-factor
    /// parameters. Both sides of a vault must agree on them.
    pub fn with_kdf_params(
        remote: Arc<dyn RemoteVault>,
        mirror: MirrorStore,
        kdf: KdfParams,
    ) -> Self {
        Self {
            remote,
            mirror,
            kdf,
            session: None,
        }
    }

    /// Unlock a vault: fetch the remote record (falling back to the local
    /// mirror), decrypt, and populate the session.
    ///
    /// Failure modes:
    /// - [`SyncError::IdentifierTaken`]: the identifier is owned by a
    ///   different security code. The session is reset; re-entering
    ///   credentials is required.
    /// - [`SyncError::WrongSecret`]: a blob was found but did not decrypt
    ///   under this code. The coordinator remains locked and no other
    ///   state is consumed.
    pub async fn unlock(&mut self, sync_id: &str, security_code: &str) -> Result<UnlockReport> {
        let fingerprint = ownership_fingerprint(sync_id, security_code);

        let (remote_blob, connectivity) = match self.remote.fetch(sync_id, &fingerprint).await {
            Ok(FetchOutcome::Found(record)) => {
                (Some(record.encrypted_content), Connectivity::Online)
            }
            Ok(FetchOutcome::Forbidden) => {
                self.session = None;
                return Err(SyncError::IdentifierTaken);
            }
            Ok(FetchOutcome::Missing) => (None, Connectivity::Online),
            Err(RemoteError::Unreachable(reason)) => {
                tracing::warn!(sync_id, %reason, "remote unreachable during unlock");
                (None, Connectivity::Offline)
            }
            Err(RemoteError::Storage(detail)) => {
                tracing::warn!(sync_id, %detail, "remote storage fault during unlock");
                (None, Connectivity::Degraded)
            }
        };

        let (blob, source) = match remote_blob {
            Some(blob) => (Some(blob), UnlockSource::Remote),
            None => match self.mirror.load(sync_id)? {
                Some(blob) => (Some(blob), UnlockSource::LocalMirror),
                None => (None, UnlockSource::Fresh),
            },
        };

        let plaintext = match &blob {
            Some(blob) => {
                decrypt_note(blob, security_code, &self.kdf).map_err(|_| SyncError::WrongSecret)?
            }
            None => String::new(),
        };

        self.session = Some(Session {
            sync_id: sync_id.to_string(),
            security_code: security_code.to_string(),
            fingerprint,
            last_known_plaintext: plaintext.clone(),
            connectivity,
        });

        tracing::info!(sync_id, ?source, ?connectivity, "vault unlocked");

        Ok(UnlockReport {
            plaintext,
            connectivity,
            source,
        })
    }

    /// Save note content: encrypt, write the local mirror, then attempt
    /// the remote push. The local write happens regardless of remote
    /// reachability; the local copy is always authoritative for resuming
    /// the session.
    pub async fn save(&mut self, content: &str) -> Result<SaveOutcome> {
        let session = self.session.as_mut().ok_or(SyncError::Locked)?;

        if content == session.last_known_plaintext {
            return Ok(SaveOutcome::Unchanged);
        }

        let blob = encrypt_note(content, &session.security_code, &self.kdf)?.to_base64();
        self.mirror.store(&session.sync_id, &blob)?;

        match self
            .remote
            .push(&session.sync_id, &blob, &session.fingerprint)
            .await
        {
            Ok(PushOutcome::Accepted) => {
                session.last_known_plaintext = content.to_string();
                session.connectivity = Connectivity::Online;
                Ok(SaveOutcome::Synced)
            }
            // Ownership conflict, not a network fault: connectivity and
            // the dirty baseline are both left alone, so the next save
            // retries the push.
            Ok(PushOutcome::Forbidden) => Ok(SaveOutcome::Conflict),
            Err(RemoteError::Unreachable(reason)) => {
                tracing::warn!(sync_id = %session.sync_id, %reason, "push failed, saved locally");
                session.connectivity = Connectivity::Offline;
                Ok(SaveOutcome::SavedLocally(Connectivity::Offline))
            }
            Err(RemoteError::Storage(detail)) => {
                tracing::warn!(sync_id = %session.sync_id, %detail, "storage fault, saved locally");
                session.connectivity = Connectivity::Degraded;
                Ok(SaveOutcome::SavedLocally(Connectivity::Degraded))
            }
        }
    }

    /// Wipe the session unconditionally. Does not touch the local mirror
    /// or remote state, and implies no save.
    pub fn lock(&mut self) {
        if self.session.take().is_some() {
            tracing::info!("vault locked");
        }
    }

    /// Delete the vault. Only valid while unlocked. The remote record is
    /// removed first; the local mirror entry goes only after the remote
    /// accepts (or has nothing), so a refused or unreachable delete leaves
    /// everything intact.
    pub async fn delete_vault(&mut self) -> Result<DeleteOutcome> {
        let session = self.session.as_ref().ok_or(SyncError::Locked)?;

        match self
            .remote
            .delete(&session.sync_id, &session.fingerprint)
            .await
        {
            // A missing remote record means there is nothing left to own;
            // proceed with local removal.
            Ok(RemoveOutcome::Removed) | Ok(RemoveOutcome::Missing) => {
                let sync_id = session.sync_id.clone();
                self.mirror.remove(&sync_id)?;
                self.session = None;
                tracing::info!(sync_id = %sync_id, "vault deleted");
                Ok(DeleteOutcome::Deleted)
            }
            Ok(RemoveOutcome::Forbidden) => Ok(DeleteOutcome::Conflict),
            Err(RemoteError::Unreachable(_)) => {
                Ok(DeleteOutcome::Unavailable(Connectivity::Offline))
            }
            Err(RemoteError::Storage(_)) => Ok(DeleteOutcome::Unavailable(Connectivity::Degraded)),
        }
    }

    /// True while a session is active.
    pub fn is_unlocked(&self) -> bool {
        self.session.is_some()
    }

    /// Connectivity as last observed, if unlocked.
    pub fn connectivity(&self) -> Option<Connectivity> {
        self.session.as_ref().map(|s| s.connectivity)
    }

    /// The active sync identifier, if unlocked.
    pub fn sync_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.sync_id.as_str())
    }
}
