//! Configuration loading (spec.md §1 "Configuration loading from a YAML
//! file"; SPEC_FULL.md §11.3), grounded on `dmuso-direclaw`'s
//! `src/config.rs` `Settings`/`ConfigError` pattern — a plain `Deserialize`
//! struct loaded with `serde_yaml::from_str`, typed errors distinguishing a
//! missing file from a malformed one.

use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid yaml in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("no provider candidates configured for {0}")]
    NoProviders(&'static str),
}

/// Top-level configuration, loaded from a single YAML file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Root of all on-disk state (spec.md §6 "Filesystem layout"). Relative
    /// paths are resolved against the current working directory.
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,
    /// HTTP bind address for `echocast serve`.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Base URL used to build feed/RSS links when a request carries no
    /// usable `Host` header.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-user Episode Catalog retention cap override (spec.md §4.4
    /// default is 10).
    #[serde(default = "default_retention_cap")]
    pub retention_cap: usize,
    /// Ticket-level retry budget (spec.md §3 `max_retries`, default 3).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default)]
    pub default_user_id: Option<String>,
    #[serde(default = "default_need_summary")]
    pub need_summary: bool,
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Path to the prompt-templates YAML file (spec.md §1 "prompt templates
    /// from a YAML file"), resolved relative to this config file's
    /// directory if relative.
    #[serde(default)]
    pub prompt_templates: Option<PathBuf>,
    #[serde(default)]
    pub llm_providers: Vec<LlmProviderConfig>,
    #[serde(default)]
    pub tts_providers: Vec<TtsProviderConfig>,
}

fn default_data_root() -> PathBuf {
    PathBuf::from("./data")
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_retention_cap() -> usize {
    echocast_storage::RETENTION_CAP
}

fn default_max_retries() -> u32 {
    3
}

fn default_need_summary() -> bool {
    true
}

/// One candidate LLM backend (spec.md §3 "Provider Entry", §4.1 candidate
/// list). `vendor` selects which concrete adapter `crates/cli` wires up
/// (`"openai_compatible"` or `"nvidia"`); `credential_env` names the
/// environment variable holding the API key.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
    pub vendor: String,
    pub model: String,
    #[serde(default)]
    pub base_url: Option<String>,
    pub credential_env: String,
    #[serde(default)]
    pub priority: u32,
}

/// One candidate TTS backend. `vendor` selects `"bytedance"` (needs
/// `credential_env` to hold `"<app_id>:<access_token>"`), or `"edge_tts"`
/// (free, `credential_env` is ignored).
#[derive(Debug, Clone, Deserialize)]
pub struct TtsProviderConfig {
    pub vendor: String,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub credential_env: Option<String>,
    #[serde(default)]
    pub priority: u32,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;
        serde_yaml::from_str(&raw)
            .map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
