//! Per-job pipeline (spec.md §4.5.3): fetch → summarize → synthesize →
//! persist, with a 3-attempt rotate-on-failure policy at each provider
//! boundary and a cancellation check at every stage transition.

use crate::error::EngineError;
use crate::fetcher::{Fetcher, FetchedArticle};
use crate::webhook::{WebhookEvent, WebhookNotifier};
use echocast_core::{
    new_episode_id, Clock, Episode, JobErrorDetail, JobInput, JobResult, JobStatus, JobTicket,
    ProvidersUsed, StageKind,
};
use echocast_providers::{LlmProvider, LlmRequest, Registry, TtsProvider};
use echocast_storage::{DataRoot, EpisodeCatalog, JobStatusStore, PendingTicket, QueueStore};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Per-stage attempt budget before the ticket is considered exhausted for
/// that stage (spec.md §4.5.3 "total attempts ≤ 3").
const MAX_STAGE_ATTEMPTS: u32 = 3;

pub struct PipelineDeps<C: Clock> {
    pub root: DataRoot,
    pub queue: QueueStore,
    pub job_status: JobStatusStore,
    pub episodes: EpisodeCatalog,
    pub llm_registry: Arc<Registry<dyn LlmProvider>>,
    pub tts_registry: Arc<Registry<dyn TtsProvider>>,
    pub fetcher: Arc<dyn Fetcher>,
    pub webhook: Option<WebhookNotifier>,
    pub prompt_template: Option<String>,
    pub clock: C,
}

/// Runs one ticket end to end. Provider/validation failures are handled
/// internally (status transitions + queue outcome); this only returns `Err`
/// for storage-layer faults that mean the pipeline couldn't even record an
/// outcome.
pub async fn run_ticket<C: Clock>(deps: &PipelineDeps<C>, pending: PendingTicket) -> Result<(), EngineError> {
    let PendingTicket { ticket, path } = pending;
    let mut status = deps.job_status.require(&ticket.job_id)?;
    let mut stage_timings: HashMap<String, f64> = HashMap::new();

    status.set_processing(&deps.clock);
    deps.job_status.save(&status)?;

    if status.cancelled {
        return finalize_cancelled(deps, &ticket, &path, &mut status).await;
    }

    // --- FETCHING -------------------------------------------------------
    status.enter_stage(StageKind::Fetching, 25, "fetching article", &deps.clock);
    deps.job_status.save(&status)?;
    let stage_started = deps.clock.now_utc();

    let article = match &ticket.input {
        JobInput::Url(url) => match deps.fetcher.fetch(url).await {
            Ok(article) => article,
            Err(err) => {
                return fail_ticket(deps, &ticket, &path, &mut status, "fetching", err.to_string()).await;
            }
        },
        // Raw-text tickets have no URL to fetch; the supplied text is the
        // article body verbatim.
        JobInput::RawText(text) => FetchedArticle { title: ticket.job_id.clone(), content: text.clone() },
    };
    stage_timings.insert("fetching".to_string(), (deps.clock.now_utc() - stage_started).num_milliseconds() as f64 / 1000.0);

    if status.cancelled {
        return finalize_cancelled(deps, &ticket, &path, &mut status).await;
    }

    // --- LLM_PROCESSING (optional) --------------------------------------
    let mut tokens_used = None;
    let mut llm_label = None;
    let script_body;

    if ticket.need_summary {
        status.enter_stage(StageKind::LlmProcessing, 50, "summarizing", &deps.clock);
        deps.job_status.save(&status)?;
        let stage_started = deps.clock.now_utc();

        let prompt_template = deps.prompt_template.as_deref();
        let mut last_error = None;
        let mut summary = None;

        for attempt in 1..=MAX_STAGE_ATTEMPTS {
            let provider = match deps.llm_registry.current() {
                Ok(provider) => provider,
                Err(err) => {
                    last_error = Some(err.to_string());
                    break;
                }
            };
            let request = LlmRequest { text: &article.content, prompt_template };
            match provider.summarize(request).await {
                Ok(output) => {
                    llm_label = Some(provider.label().to_string());
                    tokens_used = output.tokens_used;
                    summary = Some(output.summary);
                    break;
                }
                Err(err) => {
                    warn!(provider = provider.label(), attempt, error = %err, "llm attempt failed");
                    last_error = Some(err.to_string());
                    deps.llm_registry.report_failure();
                }
            }
        }

        stage_timings.insert("llm_processing".to_string(), (deps.clock.now_utc() - stage_started).num_milliseconds() as f64 / 1000.0);

        match summary {
            Some(summary) => script_body = summary,
            None => {
                let message = last_error.unwrap_or_else(|| "no LLM provider available".to_string());
                return fail_ticket(deps, &ticket, &path, &mut status, "llm_processing", message).await;
            }
        }
    } else {
        script_body = article.content.clone();
    }

    if status.cancelled {
        return finalize_cancelled(deps, &ticket, &path, &mut status).await;
    }

    let script_text = format!(
        "# {title}\nSource: {source}\nGenerated: {generated}\nMode: {mode}\n\n{body}",
        title = article.title,
        source = ticket.input.as_url().unwrap_or("raw-text"),
        generated = deps.clock.now_utc().to_rfc3339(),
        mode = if ticket.need_summary { "summary" } else { "raw" },
        body = script_body,
    );

    // --- TTS_GENERATING ---------------------------------------------------
    status.enter_stage(StageKind::TtsGenerating, 90, "synthesizing audio", &deps.clock);
    deps.job_status.save(&status)?;
    let stage_started = deps.clock.now_utc();

    let mut last_error = None;
    let mut synthesized = None;
    let mut tts_label = None;

    for attempt in 1..=MAX_STAGE_ATTEMPTS {
        let provider = match deps.tts_registry.current() {
            Ok(provider) => provider,
            Err(err) => {
                last_error = Some(err.to_string());
                break;
            }
        };
        match provider.synthesize(&script_text, &ticket.tts_options).await {
            Ok(output) => {
                tts_label = Some(provider.label().to_string());
                synthesized = Some(output);
                break;
            }
            Err(err) => {
                warn!(provider = provider.label(), attempt, error = %err, "tts attempt failed");
                last_error = Some(err.to_string());
                deps.tts_registry.report_failure();
            }
        }
    }

    stage_timings.insert("tts_generating".to_string(), (deps.clock.now_utc() - stage_started).num_milliseconds() as f64 / 1000.0);

    let synthesized = match synthesized {
        Some(output) => output,
        None => {
            let message = last_error.unwrap_or_else(|| "no TTS provider available".to_string());
            return fail_ticket(deps, &ticket, &path, &mut status, "tts_generating", message).await;
        }
    };

    if status.cancelled {
        return finalize_cancelled(deps, &ticket, &path, &mut status).await;
    }

    // --- PERSIST ----------------------------------------------------------
    let episode_id = new_episode_id(&deps.clock);
    let audio_path = deps.root.audio_path(&ticket.user_id, &episode_id, &synthesized.extension);
    if let Some(parent) = audio_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| EngineError::Io { path: parent.to_path_buf(), source: e })?;
    }
    std::fs::write(&audio_path, &synthesized.audio_bytes)
        .map_err(|e| EngineError::Io { path: audio_path.clone(), source: e })?;

    let script_path = deps.root.script_path(&ticket.user_id, &episode_id);
    std::fs::write(&script_path, &script_text).map_err(|e| EngineError::Io { path: script_path.clone(), source: e })?;

    let audio_file = format!("{episode_id}.{}", synthesized.extension);
    let providers_used = ProvidersUsed { llm: llm_label, tts: tts_label };
    let episode = Episode {
        id: episode_id.clone(),
        title: article.title.clone(),
        created_at: deps.clock.now_utc(),
        audio_file: audio_file.clone(),
        size_bytes: synthesized.audio_bytes.len() as u64,
        duration_seconds: synthesized.duration_seconds,
        source_url: ticket.input.as_url().map(str::to_string),
        tokens_used,
        providers_used: providers_used.clone(),
        stage_timings,
    };
    deps.episodes.add(&ticket.user_id, episode)?;

    let audio_url = format!("episodes/{}/{}", ticket.user_id, audio_file);
    let result = JobResult {
        audio_url,
        episode_id,
        title: article.title,
        duration_seconds: synthesized.duration_seconds,
        tokens_used,
        providers_used,
    };

    status.complete(result.clone(), &deps.clock);
    deps.job_status.save(&status)?;
    deps.queue.mark_processed(&path)?;

    if let Some(webhook) = &deps.webhook {
        webhook.notify(WebhookEvent::JobSuccess, &json!({ "job_id": ticket.job_id, "result": result }), deps.clock.now_utc()).await;
    }

    info!(job_id = %ticket.job_id, user_id = %ticket.user_id, "job completed");
    Ok(())
}

async fn fail_ticket<C: Clock>(
    deps: &PipelineDeps<C>,
    ticket: &JobTicket,
    path: &std::path::Path,
    status: &mut JobStatus,
    stage: &str,
    message: String,
) -> Result<(), EngineError> {
    status.fail(JobErrorDetail { stage: stage.to_string(), message: message.clone() }, &deps.clock);
    deps.job_status.save(status)?;

    if ticket.retry_count < ticket.max_retries {
        deps.queue.retry(path, &message, &deps.clock)?;
    } else {
        deps.queue.mark_failed(path, &message, &deps.clock)?;
    }

    if let Some(webhook) = &deps.webhook {
        webhook
            .notify(WebhookEvent::JobFailed, &json!({ "job_id": ticket.job_id, "stage": stage, "error": message }), deps.clock.now_utc())
            .await;
    }

    warn!(job_id = %ticket.job_id, stage, "job failed");
    Ok(())
}

async fn finalize_cancelled<C: Clock>(
    deps: &PipelineDeps<C>,
    ticket: &JobTicket,
    path: &std::path::Path,
    status: &mut JobStatus,
) -> Result<(), EngineError> {
    status.finalize_cancel(&deps.clock);
    deps.job_status.save(status)?;
    // Cancellation consumes the ticket (spec.md §9 Open Questions) rather
    // than resurrecting it on a later drain.
    deps.queue.mark_processed(path)?;
    info!(job_id = %ticket.job_id, "job cancelled");
    Ok(())
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
