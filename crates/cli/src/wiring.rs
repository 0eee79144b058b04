//! Wires a loaded [`Config`] into the collaborator objects the Worker and
//! Ingest Server need (spec.md §9 "Singletons... re-cast as explicit
//! collaborator objects constructed at process start").

use crate::config::{Config, LlmProviderConfig, TtsProviderConfig};
use anyhow::{bail, Context, Result};
use echocast_providers::{
    ByteDancePodcastProvider, EdgeTtsProvider, LlmProvider, OpenAiCompatibleProvider, Registry,
    TtsProvider,
};
use std::sync::Arc;

/// Build a [`LlmProvider`] trait object from one config entry, resolving
/// its credential from the named environment variable.
fn build_llm(entry: &LlmProviderConfig) -> Result<Arc<dyn LlmProvider>> {
    let credential = std::env::var(&entry.credential_env)
        .with_context(|| format!("missing environment variable {} for LLM vendor {}", entry.credential_env, entry.vendor))?;

    match entry.vendor.as_str() {
        "openai_compatible" => {
            let base_url = entry
                .base_url
                .as_deref()
                .context("openai_compatible LLM provider requires base_url")?;
            Ok(Arc::new(OpenAiCompatibleProvider::new("openai_compatible", base_url, &entry.model, credential)))
        }
        "nvidia" => Ok(Arc::new(echocast_providers::nvidia_provider(&entry.model, credential))),
        other => bail!("unknown LLM provider vendor {other:?}"),
    }
}

/// Build a [`TtsProvider`] trait object from one config entry. `edge_tts`
/// needs no credential (spec.md §4.1 "a free/unauthenticated service").
fn build_tts(entry: &TtsProviderConfig) -> Result<Arc<dyn TtsProvider>> {
    match entry.vendor.as_str() {
        "bytedance" => {
            let credential_env = entry
                .credential_env
                .as_deref()
                .context("bytedance TTS provider requires credential_env")?;
            let raw = std::env::var(credential_env)
                .with_context(|| format!("missing environment variable {credential_env} for TTS vendor bytedance"))?;
            let (app_id, access_token) = raw
                .split_once(':')
                .context("BYTEDANCE credential must be formatted as \"<app_id>:<access_token>\"")?;
            Ok(Arc::new(ByteDancePodcastProvider::new(app_id, access_token)))
        }
        "edge_tts" => {
            let voice = entry.voice.clone().unwrap_or_else(|| "en-US-AriaNeural".to_string());
            Ok(Arc::new(EdgeTtsProvider::new(voice)))
        }
        other => bail!("unknown TTS provider vendor {other:?}"),
    }
}

/// Build both registries, probing every configured candidate in priority
/// order (spec.md §4.1 "Startup probe") and dropping any that fail. Errors
/// out if constructing a candidate itself fails (bad config, missing
/// credential) rather than silently excluding it — only the *health probe*
/// is allowed to exclude a well-formed candidate.
pub async fn build_registries(
    config: &Config,
) -> Result<(Arc<Registry<dyn LlmProvider>>, Arc<Registry<dyn TtsProvider>>)> {
    let mut llm_candidates = config.llm_providers.clone();
    llm_candidates.sort_by_key(|e| e.priority);
    let mut llm_built = Vec::with_capacity(llm_candidates.len());
    for entry in &llm_candidates {
        llm_built.push(build_llm(entry)?);
    }

    let mut tts_candidates = config.tts_providers.clone();
    tts_candidates.sort_by_key(|e| e.priority);
    let mut tts_built = Vec::with_capacity(tts_candidates.len());
    for entry in &tts_candidates {
        tts_built.push(build_tts(entry)?);
    }

    let llm_registry = Registry::build(llm_built).await;
    if llm_registry.is_empty() && !llm_candidates.is_empty() {
        bail!("no configured LLM provider passed its startup health check");
    }
    let tts_registry = Registry::build(tts_built).await;
    if tts_registry.is_empty() {
        bail!("no configured TTS provider passed its startup health check");
    }

    Ok((Arc::new(llm_registry), Arc::new(tts_registry)))
}
