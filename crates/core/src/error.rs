//! Shared error glue. Each crate that touches the filesystem defines its
//! own `thiserror` enum at its own boundary (see `echocast-storage`'s
//! `StorageError`); this module only holds the few error types shared
//! across crate boundaries via `echocast-core`.

use thiserror::Error;

/// Errors from atomic JSON file persistence, shared by every crate that
/// reads/writes on-disk documents (Queue Store, Job Status Store, Episode
/// Catalog) via [`crate::atomic::write_json_atomic`] /
/// [`crate::atomic::read_json`].
#[derive(Debug, Error)]
pub enum AtomicIoError {
    #[error("io error at {path}: {source}")]
    Io { path: std::path::PathBuf, source: std::io::Error },
    #[error("json error at {path}: {source}")]
    Json { path: std::path::PathBuf, source: serde_json::Error },
}
