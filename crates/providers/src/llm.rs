//! LLM provider trait — text summarization (spec.md §4.1, §4.5.3 stage 2).

use crate::error::ProviderError;
use crate::registry::HealthCheckable;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct LlmRequest<'a> {
    pub text: &'a str,
    pub prompt_template: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct LlmOutput {
    pub summary: String,
    pub tokens_used: Option<u32>,
}

/// One chat-completion-style backend. Implementations own their own HTTP
/// client and credentials; the registry only ever sees this trait object.
#[async_trait]
pub trait LlmProvider: HealthCheckable {
    async fn summarize(&self, request: LlmRequest<'_>) -> Result<LlmOutput, ProviderError>;
}
