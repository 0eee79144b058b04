//! OpenAI-compatible chat completion provider (spec.md §4.1, §4.5.3).
//!
//! Also backs the NVIDIA NIM endpoint, which speaks the same wire format
//! under a different base URL and model catalog.

use crate::error::ProviderError;
use crate::llm::{LlmOutput, LlmProvider, LlmRequest};
use crate::registry::HealthCheckable;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_SUMMARY_PROMPT: &str =
    "Summarize the following article for narration as a podcast script:\n\n{text}";

pub struct OpenAiCompatibleProvider {
    label: String,
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(label: impl Into<String>, base_url: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(300))
                .build()
                .unwrap_or_default(),
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    total_tokens: Option<u32>,
}

#[async_trait]
impl HealthCheckable for OpenAiCompatibleProvider {
    fn label(&self) -> &str {
        &self.label
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        self.client
            .get(self.models_url())
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|err| ProviderError::RequestFailed { vendor: self.label.clone(), message: err.to_string() })?
            .error_for_status()
            .map_err(|err| ProviderError::RequestFailed { vendor: self.label.clone(), message: err.to_string() })?;
        Ok(())
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    async fn summarize(&self, request: LlmRequest<'_>) -> Result<LlmOutput, ProviderError> {
        let prompt_template = request.prompt_template.unwrap_or(DEFAULT_SUMMARY_PROMPT);
        let prompt = prompt_template.replace("{text}", request.text);

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: &prompt }],
        };

        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| ProviderError::RequestFailed { vendor: self.label.clone(), message: err.to_string() })?;

        let response = response
            .error_for_status()
            .map_err(|err| ProviderError::RequestFailed { vendor: self.label.clone(), message: err.to_string() })?;

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::InvalidResponse { vendor: self.label.clone(), message: err.to_string() })?;

        let summary = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse {
                vendor: self.label.clone(),
                message: "no choices in response".to_string(),
            })?;

        Ok(LlmOutput { summary, tokens_used: parsed.usage.and_then(|u| u.total_tokens) })
    }
}
