//! Engine-layer errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Storage(#[from] echocast_storage::StorageError),

    #[error("failed to acquire worker lock, another instance is draining")]
    LockHeld,

    #[error("io error at {path}: {source}")]
    Io { path: std::path::PathBuf, source: std::io::Error },
}
