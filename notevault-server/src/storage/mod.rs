//! SQLite storage for vault records.
//!
//! One record per sync identifier. The update path (compare stored
//! fingerprint, conditionally write) runs as a single conditional upsert
//! on one connection, so two holders of different security codes cannot
//! race to claim the same identifier.

pub mod models;

use crate::error::ServerError;
use self::models::StoredVault;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Result of a conditional upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// Record created or overwritten.
    Accepted,
    /// Record exists under a different fingerprint; nothing was written.
    FingerprintMismatch,
}

/// Result of a conditional delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    FingerprintMismatch,
    Missing,
}

/// Thread-safe vault record storage.
#[derive(Clone)]
pub struct VaultStorage {
    conn: Arc<Mutex<Connection>>,
}

impl VaultStorage {
    pub fn open(path: &Path) -> Result<Self, anyhow::Error> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let storage = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    pub fn in_memory() -> Result<Self, anyhow::Error> {
        let conn = Connection::open_in_memory()?;

        let storage = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    fn initialize_schema(&self) -> Result<(), anyhow::Error> {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("{}", e))?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS vault_records (
                sync_id TEXT PRIMARY KEY,
                encrypted_blob TEXT NOT NULL,
                fingerprint TEXT NOT NULL,
                last_updated TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, ServerError> {
        self.conn
            .lock()
            .map_err(|e| ServerError::Internal(format!("Lock error: {}", e)))
    }

    /// Fetch the record for an identifier, if any.
    pub fn fetch(&self, sync_id: &str) -> Result<Option<StoredVault>, ServerError> {
        let conn = self.conn()?;
        let result = conn.query_row(
            "SELECT sync_id, encrypted_blob, fingerprint, last_updated
             FROM vault_records WHERE sync_id = ?1",
            [sync_id],
            |row| {
                Ok(StoredVault {
                    sync_id: row.get(0)?,
                    encrypted_blob: row.get(1)?,
                    fingerprint: row.get(2)?,
                    last_updated: row.get(3)?,
                })
            },
        );

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Create or overwrite the record for an identifier. The overwrite is
    /// applied only when the stored fingerprint matches the presented one;
    /// the check and the write are one atomic statement.
    pub fn upsert(
        &self,
        sync_id: &str,
        encrypted_blob: &str,
        fingerprint: &str,
        last_updated: &str,
    ) -> Result<UpsertOutcome, ServerError> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "INSERT INTO vault_records (sync_id, encrypted_blob, fingerprint, last_updated)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(sync_id) DO UPDATE SET
                encrypted_blob = excluded.encrypted_blob,
                last_updated = excluded.last_updated
             WHERE vault_records.fingerprint = excluded.fingerprint",
            rusqlite::params![sync_id, encrypted_blob, fingerprint, last_updated],
        )?;

        if changed == 1 {
            Ok(UpsertOutcome::Accepted)
        } else {
            Ok(UpsertOutcome::FingerprintMismatch)
        }
    }

    /// Delete the record for an identifier, requiring a fingerprint match.
    pub fn remove(&self, sync_id: &str, fingerprint: &str) -> Result<RemoveOutcome, ServerError> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM vault_records WHERE sync_id = ?1 AND fingerprint = ?2",
            rusqlite::params![sync_id, fingerprint],
        )?;

        if changed == 1 {
            return Ok(RemoveOutcome::Removed);
        }

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM vault_records WHERE sync_id = ?1)",
            [sync_id],
            |row| row.get(0),
        )?;

        if exists {
            Ok(RemoveOutcome::FingerprintMismatch)
        } else {
            Ok(RemoveOutcome::Missing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_push_claims_identifier() {
        let storage = VaultStorage::in_memory().unwrap();

        let outcome = storage.upsert("alpha", "blob-1", "fp-1", "t1").unwrap();
        assert_eq!(outcome, UpsertOutcome::Accepted);

        let record = storage.fetch("alpha").unwrap().unwrap();
        assert_eq!(record.encrypted_blob, "blob-1");
        assert_eq!(record.fingerprint, "fp-1");
    }

    #[test]
    fn test_owner_can_overwrite() {
        let storage = VaultStorage::in_memory().unwrap();
        storage.upsert("alpha", "blob-1", "fp-1", "t1").unwrap();

        let outcome = storage.upsert("alpha", "blob-2", "fp-1", "t2").unwrap();
        assert_eq!(outcome, UpsertOutcome::Accepted);

        let record = storage.fetch("alpha").unwrap().unwrap();
        assert_eq!(record.encrypted_blob, "blob-2");
        assert_eq!(record.last_updated, "t2");
    }

    #[test]
    fn test_mismatch_leaves_record_unchanged() {
        let storage = VaultStorage::in_memory().unwrap();
        storage.upsert("alpha", "blob-1", "fp-1", "t1").unwrap();

        let outcome = storage.upsert("alpha", "blob-2", "fp-2", "t2").unwrap();
        assert_eq!(outcome, UpsertOutcome::FingerprintMismatch);

        let record = storage.fetch("alpha").unwrap().unwrap();
        assert_eq!(record.encrypted_blob, "blob-1");
        assert_eq!(record.fingerprint, "fp-1");
        assert_eq!(record.last_updated, "t1");
    }

    #[test]
    fn test_remove_requires_matching_fingerprint() {
        let storage = VaultStorage::in_memory().unwrap();
        storage.upsert("alpha", "blob-1", "fp-1", "t1").unwrap();

        assert_eq!(
            storage.remove("alpha", "fp-2").unwrap(),
            RemoveOutcome::FingerprintMismatch
        );
        assert!(storage.fetch("alpha").unwrap().is_some());

        assert_eq!(
            storage.remove("alpha", "fp-1").unwrap(),
            RemoveOutcome::Removed
        );
        assert!(storage.fetch("alpha").unwrap().is_none());
    }

    #[test]
    fn test_remove_missing() {
        let storage = VaultStorage::in_memory().unwrap();
        assert_eq!(
            storage.remove("ghost", "fp-1").unwrap(),
            RemoveOutcome::Missing
        );
    }

    #[test]
    fn test_identifiers_are_independent() {
        let storage = VaultStorage::in_memory().unwrap();
        storage.upsert("alpha", "a", "fp-a", "t1").unwrap();
        storage.upsert("beta", "b", "fp-b", "t1").unwrap();

        assert_eq!(storage.fetch("alpha").unwrap().unwrap().encrypted_blob, "a");
        assert_eq!(storage.fetch("beta").unwrap().unwrap().encrypted_blob, "b");
    }
}
