//! Local mirror of encrypted blobs, one file per sync identifier.
//!
//! The mirror is the durability backstop: it is written before every
//! remote push and read when the remote has nothing usable. Entries never
//! expire; they are removed only by explicit vault deletion.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File-backed local mirror store. Keys follow the `vault_<syncId>`
/// convention of the original local storage.
pub struct MirrorStore {
    dir: PathBuf,
}

impl MirrorStore {
    /// Open (and create if needed) a mirror store rooted at `dir`.
    pub fn open(dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn entry_path(&self, sync_id: &str) -> io::Result<PathBuf> {
        // Identifiers become file names; anything that could escape the
        // mirror directory is refused outright.
        if sync_id.is_empty()
            || sync_id.contains(['/', '\\', '\0'])
            || sync_id == "."
            || sync_id == ".."
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid sync identifier: {:?}", sync_id),
            ));
        }
        Ok(self.dir.join(format!("vault_{}", sync_id)))
    }

    /// Read the mirrored blob for an identifier. Absence is an empty new
    /// vault, not an error.
    pub fn load(&self, sync_id: &str) -> io::Result<Option<String>> {
        let path = self.entry_path(sync_id)?;
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write the mirrored blob for an identifier.
    pub fn store(&self, sync_id: &str, blob: &str) -> io::Result<()> {
        let path = self.entry_path(sync_id)?;
        fs::write(&path, blob)?;
        tracing::debug!(sync_id, "wrote local mirror entry");
        Ok(())
    }

    /// Remove the mirrored blob for an identifier. Removing a missing
    /// entry is not an error.
    pub fn remove(&self, sync_id: &str) -> io::Result<()> {
        let path = self.entry_path(sync_id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
