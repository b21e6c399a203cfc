//! Offline-first synchronization for the encrypted notepad.
//!
//! Implements:
//! - The sync coordinator state machine (unlock, debounced save, lock,
//!   vault deletion)
//! - The local mirror store, always written before any network attempt
//! - The remote vault collaborator trait and its HTTP implementation
//! - Graceful degradation to local-only operation on network failure

#[cfg(feature = "sync")]
pub mod client;
pub mod coordinator;
pub mod debounce;
pub mod mirror;
pub mod models;
pub mod remote;


#[cfg(feature = "sync")]
pub use client::HttpRemoteVault;
pub use coordinator::SyncCoordinator;
pub use debounce::SaveDebouncer;
pub use mirror::MirrorStore;
pub use models::{
    Connectivity, DeleteOutcome, NoteRecord, SaveOutcome, UnlockReport, UnlockSource,
};
pub use remote::{FetchOutcome, PushOutcome, RemoteError, RemoteVault, RemoveOutcome};

use thiserror::Error;

/// Hard failures surfaced by the sync coordinator. Degradable conditions
/// (conflict, unreachable, storage fault) are reported as operation
/// outcomes instead, so the caller decides the UI effect.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Decryption authentication failure. Recoverable by re-entering the
    /// security code; the coordinator stays locked.
    #[error("Wrong security code for this vault")]
    WrongSecret,

    /// The identifier is owned by a different security code. Fatal to the
    /// unlock attempt; the session is reset.
    #[error("This identifier is already taken by another security code")]
    IdentifierTaken,

    /// Operation requires an unlocked session.
    #[error("Vault is locked")]
    Locked,

    #[error("Crypto error: {0}")]
    Crypto(#[from] crate::crypto::CryptoError),

    /// Local mirror read/write failure.
    #[error("Local mirror error: {0}")]
    Mirror(#[from] std::io::Error),
}

/// Result type for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
