//! Prompt templates (spec.md §1 "prompt templates from a YAML file";
//! SPEC_FULL.md §11.3): system/user prompt text for the summarization
//! stage, loaded once at startup.
//!
//! `echocast-providers`' `LlmRequest.prompt_template` contract is a single
//! string with one `{text}` placeholder (`OpenAiCompatibleProvider`
//! substitutes the fetched article body into it directly); this module's
//! job is just to let an operator override that string, plus its
//! `system_prompt` preamble, from YAML instead of the provider's built-in
//! default.

use crate::config::ConfigError;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a podcast scriptwriter. Turn the supplied article into a concise, \
     engaging narration script suitable for text-to-speech.";
const DEFAULT_USER_PROMPT: &str = "Summarize the following article for narration as a podcast script:\n\n{text}";

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct PromptTemplates {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Must contain exactly one `{text}` placeholder.
    #[serde(default = "default_user_prompt")]
    pub user_prompt: String,
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_user_prompt() -> String {
    DEFAULT_USER_PROMPT.to_string()
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self { system_prompt: default_system_prompt(), user_prompt: default_user_prompt() }
    }
}

impl PromptTemplates {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;
        serde_yaml::from_str(&raw)
            .map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })
    }

    /// The single string handed to `LlmRequest.prompt_template`: the system
    /// preamble followed by the user template, with the `{text}`
    /// placeholder preserved for the provider's own substitution.
    pub fn as_request_template(&self) -> String {
        format!("{}\n\n{}", self.system_prompt, self.user_prompt)
    }
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
