//! In-memory fake providers for use by other crates' tests (`test-support`
//! feature), grounded on the teacher's `#[cfg(test)] mod fake` pattern
//! (`crates/daemon/src/adapters/agent/mod.rs`), generalized to a
//! non-`#[cfg(test)]` feature since `echocast-engine` and `echocast-server`
//! need these fakes from their own test modules, across the crate
//! boundary.

use crate::error::ProviderError;
use crate::llm::{LlmOutput, LlmProvider, LlmRequest};
use crate::registry::HealthCheckable;
use crate::tts::{TtsOutput, TtsProvider};
use async_trait::async_trait;
use echocast_core::TtsOptions;
use parking_lot::Mutex;
use std::sync::Arc;

/// A fake LLM that echoes back a fixed summary, or fails on demand.
pub struct FakeLlmProvider {
    label: String,
    fail_health_check: bool,
    fail_summarize: Mutex<bool>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeLlmProvider {
    pub fn healthy(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            fail_health_check: false,
            fail_summarize: Mutex::new(false),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unhealthy(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            fail_health_check: true,
            fail_summarize: Mutex::new(false),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Flip this fake into failing its next `summarize` calls, to exercise
    /// the registry's rotate-on-failure path.
    pub fn set_failing(&self, failing: bool) {
        *self.fail_summarize.lock() = failing;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl HealthCheckable for FakeLlmProvider {
    fn label(&self) -> &str {
        &self.label
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.fail_health_check {
            Err(ProviderError::RequestFailed { vendor: self.label.clone(), message: "fake down".to_string() })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LlmProvider for FakeLlmProvider {
    async fn summarize(&self, request: LlmRequest<'_>) -> Result<LlmOutput, ProviderError> {
        self.calls.lock().push(request.text.to_string());
        if *self.fail_summarize.lock() {
            return Err(ProviderError::RequestFailed { vendor: self.label.clone(), message: "fake failure".to_string() });
        }
        Ok(LlmOutput {
            summary: format!("summary of: {}", request.text.chars().take(40).collect::<String>()),
            tokens_used: Some(request.text.split_whitespace().count() as u32),
        })
    }
}

/// A fake TTS backend that returns a small deterministic byte buffer.
pub struct FakeTtsProvider {
    label: String,
    fail_health_check: bool,
    fail_synthesize: Mutex<bool>,
}

impl FakeTtsProvider {
    pub fn healthy(label: impl Into<String>) -> Self {
        Self { label: label.into(), fail_health_check: false, fail_synthesize: Mutex::new(false) }
    }

    pub fn unhealthy(label: impl Into<String>) -> Self {
        Self { label: label.into(), fail_health_check: true, fail_synthesize: Mutex::new(false) }
    }

    pub fn set_failing(&self, failing: bool) {
        *self.fail_synthesize.lock() = failing;
    }
}

#[async_trait]
impl HealthCheckable for FakeTtsProvider {
    fn label(&self) -> &str {
        &self.label
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.fail_health_check {
            Err(ProviderError::RequestFailed { vendor: self.label.clone(), message: "fake down".to_string() })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TtsProvider for FakeTtsProvider {
    async fn synthesize(&self, text: &str, options: &TtsOptions) -> Result<TtsOutput, ProviderError> {
        if *self.fail_synthesize.lock() {
            return Err(ProviderError::RequestFailed { vendor: self.label.clone(), message: "fake failure".to_string() });
        }
        let audio_bytes = text.as_bytes().to_vec();
        Ok(TtsOutput {
            duration_seconds: (text.split_whitespace().count() as f64 / 2.5).max(1.0),
            extension: options.extension().to_string(),
            audio_bytes,
        })
    }
}
