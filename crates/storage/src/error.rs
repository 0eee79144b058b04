//! Storage-layer errors.

use echocast_core::AtomicIoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] AtomicIoError),
    #[error("ticket not found at {0}")]
    TicketNotFound(std::path::PathBuf),
    #[error("job status not found: {0}")]
    JobNotFound(String),
    #[error("episode not found: {0}")]
    EpisodeNotFound(String),
}
