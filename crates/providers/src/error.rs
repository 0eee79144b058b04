//! Provider-facing errors (spec.md §4.1).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{vendor} request failed: {message}")]
    RequestFailed { vendor: String, message: String },

    #[error("{vendor} timed out after {elapsed_ms}ms")]
    Timeout { vendor: String, elapsed_ms: u64 },

    #[error("{vendor} returned an unparsable response: {message}")]
    InvalidResponse { vendor: String, message: String },

    #[error("no healthy provider configured for this kind")]
    NoneAvailable,

    #[error("missing credential: expected environment variable {0}")]
    MissingCredential(String),
}
