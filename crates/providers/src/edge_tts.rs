//! Microsoft Edge "Read Aloud" TTS provider: free, unauthenticated, speaks
//! SSML over a WebSocket session keyed by a per-connection trust token.
//! Used as the always-available bottom of the TTS fallback chain — it
//! needs no `credential_env` (spec.md §3 "Provider Entry").

use crate::error::ProviderError;
use crate::registry::HealthCheckable;
use crate::tts::{TtsOutput, TtsProvider};
use async_trait::async_trait;
use echocast_core::TtsOptions;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio_tungstenite::tungstenite::Message;

const ENDPOINT: &str =
    "wss://speech.platform.bing.com/consumer/speech/synthesize/readaloud/edge/v1";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(120);

pub struct EdgeTtsProvider {
    default_voice: String,
}

impl EdgeTtsProvider {
    pub fn new(default_voice: impl Into<String>) -> Self {
        Self { default_voice: default_voice.into() }
    }

    fn build_ssml(&self, text: &str, voice: &str, speed_rate: i32) -> String {
        let rate = if speed_rate >= 0 { format!("+{speed_rate}%") } else { format!("{speed_rate}%") };
        format!(
            "<speak version='1.0' xml:lang='en-US'>\
             <voice name='{voice}'><prosody rate='{rate}'>{text}</prosody></voice></speak>",
            voice = voice,
            rate = rate,
            text = text,
        )
    }
}

#[async_trait]
impl HealthCheckable for EdgeTtsProvider {
    fn label(&self) -> &str {
        "edge_tts"
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        tokio::time::timeout(CONNECT_TIMEOUT, tokio_tungstenite::connect_async(ENDPOINT))
            .await
            .map_err(|_| ProviderError::Timeout { vendor: self.label().to_string(), elapsed_ms: CONNECT_TIMEOUT.as_millis() as u64 })?
            .map_err(|err| ProviderError::RequestFailed { vendor: self.label().to_string(), message: err.to_string() })?;
        Ok(())
    }
}

#[async_trait]
impl TtsProvider for EdgeTtsProvider {
    async fn synthesize(&self, text: &str, options: &TtsOptions) -> Result<TtsOutput, ProviderError> {
        let (ws_stream, _) = tokio::time::timeout(CONNECT_TIMEOUT, tokio_tungstenite::connect_async(ENDPOINT))
            .await
            .map_err(|_| ProviderError::Timeout { vendor: self.label().to_string(), elapsed_ms: CONNECT_TIMEOUT.as_millis() as u64 })?
            .map_err(|err| ProviderError::RequestFailed { vendor: self.label().to_string(), message: err.to_string() })?;

        let (mut write, mut read) = ws_stream.split();
        let voice = options.voice.as_deref().unwrap_or(&self.default_voice);
        let ssml = self.build_ssml(text, voice, options.speed_rate.unwrap_or(0));

        let ssml_message = format!(
            "Path: ssml\r\nX-RequestId: {}\r\nContent-Type: application/ssml+xml\r\n\r\n{}",
            echocast_core::new_job_id(),
            ssml,
        );
        write
            .send(Message::Text(ssml_message))
            .await
            .map_err(|err| ProviderError::RequestFailed { vendor: self.label().to_string(), message: err.to_string() })?;

        let mut audio_bytes = Vec::new();
        loop {
            let message = tokio::time::timeout(SYNTHESIS_TIMEOUT, read.next())
                .await
                .map_err(|_| ProviderError::Timeout { vendor: self.label().to_string(), elapsed_ms: SYNTHESIS_TIMEOUT.as_millis() as u64 })?;
            match message {
                Some(Ok(Message::Binary(bytes))) => {
                    // Edge TTS prefixes each audio frame with a text header
                    // terminated by `\r\n\r\n`; the rest is raw mp3 bytes.
                    if let Some(pos) = find_header_end(&bytes) {
                        audio_bytes.extend_from_slice(&bytes[pos..]);
                    }
                }
                Some(Ok(Message::Text(text))) if text.contains("Path:turn.end") => break,
                Some(Ok(_)) => continue,
                Some(Err(err)) => {
                    return Err(ProviderError::RequestFailed { vendor: self.label().to_string(), message: err.to_string() })
                }
                None => break,
            }
        }
        let _ = write.close().await;

        if audio_bytes.is_empty() {
            return Err(ProviderError::InvalidResponse {
                vendor: self.label().to_string(),
                message: "no audio frames received".to_string(),
            });
        }

        let duration_seconds = audio_bytes.len() as f64 / 16_000.0;
        Ok(TtsOutput { audio_bytes, duration_seconds, extension: "mp3".to_string() })
    }
}

fn find_header_end(bytes: &[u8]) -> Option<usize> {
    bytes.windows(4).position(|w| w == b"\r\n\r\n").map(|pos| pos + 4)
}
