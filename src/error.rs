//! Error taxonomy for the capsule store.
//!
//! Validation and I/O failures during create/update/delete abort the
//! operation and leave the persisted collection in its prior state.
//! Best-effort sub-failures (media file deletion, reminder scheduling) are
//! logged by the store and never surface here.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The managed media directory cannot be created or accessed. Fatal to
    /// every other operation until resolved.
    #[error("media storage unavailable at {}: {source}", dir.display())]
    StorageUnavailable {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The temporary recording handed to create does not exist.
    #[error("recording source file missing: {}", path.display())]
    SourceFileMissing { path: PathBuf },

    /// Moving a recording into the managed directory failed (cross-volume
    /// rename, permissions, disk full). No record is written.
    #[error("failed to move recording into managed storage: {source}")]
    MoveFailed {
        #[source]
        source: std::io::Error,
    },

    /// No capsule with the given id.
    #[error("no capsule with id {0}")]
    NotFound(String),

    /// Category metadata violated an invariant at create time.
    #[error("invalid capsule metadata: {0}")]
    ValidationFailed(String),

    #[error("capsule database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The persisted collection could not be serialized or parsed.
    #[error("capsule collection serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
