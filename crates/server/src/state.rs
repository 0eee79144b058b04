//! Shared application state handed to every axum handler (spec.md §9
//! "Singletons in the source ... re-cast as explicit collaborator objects
//! constructed at process start and passed into request handlers").

use crate::qrcode::QrCodeEncoder;
use echocast_core::Clock;
use echocast_engine::{TriggerCoordinator, Worker};
use std::sync::Arc;

/// Everything a handler needs: the worker (and, through it, the queue, job
/// status store, episode catalog, clock), the trigger coordinator used to
/// fire a drain pass in the background, and the QR encoder.
#[derive(Clone)]
pub struct AppState<C: Clock> {
    pub worker: Arc<Worker<C>>,
    pub trigger: TriggerCoordinator,
    pub qrcode: Arc<dyn QrCodeEncoder>,
    /// Base URL used to build `rss_url` for the QR-code endpoint when a
    /// request doesn't carry a usable `Host` header.
    pub base_url: Arc<str>,
    pub default_llm_choice: Arc<str>,
    pub default_tts_choice: Arc<str>,
    pub default_need_summary: bool,
    pub max_retries: u32,
}

impl<C: Clock> AppState<C> {
    pub fn clock(&self) -> &C {
        &self.worker.deps.clock
    }
}
