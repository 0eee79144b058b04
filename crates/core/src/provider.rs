//! Provider Registry domain types (spec.md §4.1).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which side of the pipeline a provider serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Llm,
    Tts,
}

crate::simple_display! {
    ProviderKind {
        Llm => "llm",
        Tts => "tts",
    }
}

/// One candidate backend in a kind's priority-ordered list (spec.md §3,
/// "Provider Entry").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub kind: ProviderKind,
    /// Vendor identifier, e.g. "openai_compatible", "nvidia", "bytedance", "edge_tts".
    pub vendor: String,
    /// Model id (LLM) or voice id (TTS).
    pub model: String,
    /// Name of the environment variable holding the credential, if any.
    /// A free/unauthenticated service (e.g. edge_tts) carries `None`.
    #[serde(default)]
    pub credential_env: Option<String>,
    /// Declared priority; lower sorts first. Startup health-checking
    /// preserves this order when building the available list.
    pub priority: u32,
}

impl ProviderEntry {
    pub fn label(&self) -> String {
        format!("{}:{}", self.vendor, self.model)
    }
}

/// Recognized TTS option schema (spec.md §9 "Dynamic `tts_config`").
///
/// Unknown keys in the wire request are ignored by the deserializer's
/// default `serde(deny_unknown_fields)`-free behavior; invalid values in
/// recognized fields are rejected by [`TtsOptions::validate`] with a 400 at
/// ingest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TtsOptions {
    #[serde(default)]
    pub voice: Option<String>,
    /// Speed rate in `[-50, 100]`.
    #[serde(default)]
    pub speed_rate: Option<i32>,
    #[serde(default)]
    pub sample_rate: Option<u32>,
    #[serde(default)]
    pub use_head_music: Option<bool>,
    #[serde(default)]
    pub use_tail_music: Option<bool>,
    #[serde(default)]
    pub speakers: Vec<String>,
    #[serde(default)]
    pub random_order: Option<bool>,
    /// `"mp3"` or `"wav"`.
    #[serde(default)]
    pub encoding: Option<String>,
    /// `0` or `4`.
    #[serde(default)]
    pub action: Option<u8>,
    #[serde(default)]
    pub prompt_text: Option<String>,
    #[serde(default)]
    pub nlp_texts: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TtsOptionsError {
    #[error("speed_rate must be in [-50, 100], got {0}")]
    SpeedRateOutOfRange(i32),
    #[error("encoding must be \"mp3\" or \"wav\", got {0:?}")]
    InvalidEncoding(String),
    #[error("action must be 0 or 4, got {0}")]
    InvalidAction(u8),
}

impl TtsOptions {
    pub fn validate(&self) -> Result<(), TtsOptionsError> {
        if let Some(rate) = self.speed_rate {
            if !(-50..=100).contains(&rate) {
                return Err(TtsOptionsError::SpeedRateOutOfRange(rate));
            }
        }
        if let Some(enc) = &self.encoding {
            if enc != "mp3" && enc != "wav" {
                return Err(TtsOptionsError::InvalidEncoding(enc.clone()));
            }
        }
        if let Some(action) = self.action {
            if action != 0 && action != 4 {
                return Err(TtsOptionsError::InvalidAction(action));
            }
        }
        Ok(())
    }

    /// The output file extension implied by `encoding`, defaulting to mp3.
    pub fn extension(&self) -> &'static str {
        match self.encoding.as_deref() {
            Some("wav") => "wav",
            _ => "mp3",
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
