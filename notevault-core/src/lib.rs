//! NoteVault Core Library
//!
//! This library provides the client-side core of the NoteVault encrypted
//! notepad: the crypto engine (key derivation, authenticated encryption,
//! ownership fingerprints) and the sync coordinator that reconciles the
//! local mirror with the remote vault store.

pub mod crypto;
pub mod sync;

pub use crypto::{
    decrypt_note, encrypt_note, fingerprint, ownership_fingerprint, CryptoError, EncryptedBlob,
    KdfParams,
};
pub use sync::{
    Connectivity, DeleteOutcome, MirrorStore, SaveDebouncer, SaveOutcome, SyncCoordinator,
    SyncError, UnlockReport, UnlockSource,
};
#[cfg(feature = "sync")]
pub use sync::HttpRemoteVault;
