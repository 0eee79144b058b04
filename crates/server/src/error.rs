//! Ingest Server errors and their HTTP status mapping (spec.md §7
//! "Validation... 4xx to client, no state mutation").

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use echocast_core::{CancelError, TtsOptionsError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("missing or empty url (and no raw_text supplied)")]
    MissingInput,

    #[error("invalid tts_config: {0}")]
    InvalidTtsOptions(#[from] TtsOptionsError),

    #[error("unknown job id {0}")]
    UnknownJob(String),

    #[error("cannot cancel: {0}")]
    NotCancellable(#[from] CancelError),

    #[error(transparent)]
    Storage(#[from] echocast_storage::StorageError),

    #[error(transparent)]
    Engine(#[from] echocast_engine::EngineError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::MissingInput | ServerError::InvalidTtsOptions(_) => StatusCode::BAD_REQUEST,
            ServerError::NotCancellable(CancelError::NotCancellable(status)) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "success": false, "error": self.to_string(), "status": status.to_string() })),
                )
                    .into_response();
            }
            ServerError::UnknownJob(_) => StatusCode::NOT_FOUND,
            ServerError::Storage(_) | ServerError::Engine(_) | ServerError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "success": false, "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
