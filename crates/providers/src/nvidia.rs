//! NVIDIA NIM chat provider: a thin constructor over
//! [`OpenAiCompatibleProvider`] pointed at NVIDIA's hosted endpoint, since
//! NIM speaks the same OpenAI-style chat-completions wire format.

use crate::openai_compatible::OpenAiCompatibleProvider;

const NVIDIA_BASE_URL: &str = "https://integrate.api.nvidia.com/v1";

pub fn nvidia_provider(model: impl Into<String>, api_key: impl Into<String>) -> OpenAiCompatibleProvider {
    OpenAiCompatibleProvider::new("nvidia", NVIDIA_BASE_URL, model, api_key)
}
