//! TTS provider trait — speech synthesis (spec.md §4.1, §4.5.3 stage 3).

use crate::error::ProviderError;
use crate::registry::HealthCheckable;
use async_trait::async_trait;
use echocast_core::TtsOptions;

#[derive(Debug, Clone)]
pub struct TtsOutput {
    pub audio_bytes: Vec<u8>,
    pub duration_seconds: f64,
    /// File extension implied by the encoding actually produced (not always
    /// the one requested — some vendors only support one format).
    pub extension: String,
}

/// One speech-synthesis backend.
#[async_trait]
pub trait TtsProvider: HealthCheckable {
    async fn synthesize(
        &self,
        text: &str,
        options: &TtsOptions,
    ) -> Result<TtsOutput, ProviderError>;
}
