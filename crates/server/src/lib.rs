#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

//! echocast-server: the Ingest HTTP surface (spec.md §4.5.1, §6) — axum
//! routes, wire DTOs, and the QR-code rendering interface. Fetching and feed
//! generation are owned by `echocast-engine` (the Worker drives them
//! directly); this crate only adds the collaborator interfaces that are
//! HTTP-specific.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod qrcode;
pub mod state;

pub use dto::{CancelResponse, EpisodeSummary, GenerateRequest, GenerateResponse, HealthResponse, ProgressResponse, QrCodeResponse};
pub use error::ServerError;
pub use handlers::router;
pub use qrcode::{feed_qr_payload, ImageQrCodeEncoder, QrCodeEncoder};
pub use state::AppState;

#[cfg(feature = "test-support")]
pub mod test_support;

#[cfg(feature = "test-support")]
pub use test_support::NullQrCodeEncoder;
