//! Ingest Server HTTP handlers (spec.md §4.5.1, §6) — grounded on
//! `sneed-and-feed-INCARNATE-SOPHIA`'s `orchestrator/api.rs` for axum
//! routing/handler idiom (this teacher has no HTTP surface of its own; its
//! daemon speaks a bespoke Unix-socket protocol instead), and on
//! `original_source/src/api_routes.py` for the exact request/response
//! shapes and defaults.

use crate::dto::{
    CancelResponse, EpisodeSummary, GenerateRequest, GenerateResponse, HealthResponse,
    ProgressResponse, QrCodeResponse, QueueHealth, WorkerHealth,
};
use crate::error::ServerError;
use crate::qrcode;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use echocast_core::{new_job_id, Clock, JobInput, JobStatus, JobTicket};
use futures_util::FutureExt;
use std::collections::HashMap;
use tracing::{info, warn};

pub fn router<C: Clock>(state: AppState<C>) -> Router {
    Router::new()
        .route("/api/generate", post(generate::<C>))
        .route("/api/progress/:job_id", get(progress::<C>))
        .route("/api/cancel/:job_id", post(cancel::<C>))
        .route("/api/episodes", get(episodes::<C>))
        .route("/api/qrcode", get(qrcode_handler::<C>))
        .route("/health", get(health::<C>))
        .route("/health/worker", get(health_worker::<C>))
        .route("/health/system", get(health_system::<C>))
        .route("/health/full", get(health_full::<C>))
        .with_state(state)
}

/// `POST /api/generate` (spec.md §4.5.1, §6).
async fn generate<C: Clock>(
    State(state): State<AppState<C>>,
    Json(req): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<GenerateResponse>), ServerError> {
    let user_id = req.user_id.clone().filter(|s| !s.is_empty()).unwrap_or_else(|| "default".to_string());

    let input = match (req.url.as_deref(), req.raw_text.as_deref()) {
        (Some(url), _) if !url.trim().is_empty() => JobInput::Url(url.trim().to_string()),
        (_, Some(text)) if !text.trim().is_empty() => JobInput::RawText(text.to_string()),
        _ => return Err(ServerError::MissingInput),
    };

    let mut tts_options = req.tts_config.unwrap_or_default();
    if tts_options.prompt_text.is_none() {
        tts_options.prompt_text = req.prompt_text.clone();
    }
    if tts_options.nlp_texts.is_empty() {
        if let Some(nlp_texts) = req.nlp_texts.clone() {
            tts_options.nlp_texts = nlp_texts;
        }
    }
    tts_options.validate()?;

    let need_summary = req.need_summary.unwrap_or(state.default_need_summary);
    let clock = state.clock().clone();

    let job_id = new_job_id();
    let queue_id = echocast_core::new_queue_id(&clock);

    info!(
        %job_id,
        %user_id,
        has_url = req.url.is_some(),
        llm_model = req.llm_model.as_deref().unwrap_or(state.default_llm_choice.as_ref()),
        tts_model = req.tts_model.as_deref().unwrap_or(state.default_tts_choice.as_ref()),
        "job create requested"
    );

    let mut status = JobStatus::new_pending(&job_id, &user_id, input.as_url().map(str::to_string), &clock);
    state.worker.deps.job_status.save(&status)?;

    let mut ticket = JobTicket::new(queue_id, job_id.clone(), user_id, input, need_summary, state.max_retries, clock.now_utc());
    ticket = ticket
        .llm_choice(req.llm_model.unwrap_or_else(|| state.default_llm_choice.to_string()))
        .tts_choice(req.tts_model.unwrap_or_else(|| state.default_tts_choice.to_string()))
        .tts_options(tts_options);
    state.worker.deps.queue.add(&ticket)?;

    status.set_queued(&clock);
    state.worker.deps.job_status.save(&status)?;

    trigger_drain(&state);

    Ok((StatusCode::OK, Json(GenerateResponse { success: true, job_id })))
}

/// Fires a drain pass through the trigger coordinator, with the crash
/// cleanup spec.md §4.5.2 step 2 describes: a panicking drain marks every
/// non-terminal job FAILED rather than leaving them stuck.
fn trigger_drain<C: Clock>(state: &AppState<C>) {
    let worker = state.worker.clone();
    state.trigger.trigger(move || async move {
        let job_status = worker.deps.job_status.clone();
        let clock = worker.deps.clock.clone();
        let outcome = std::panic::AssertUnwindSafe(worker.drain_once()).catch_unwind().await;
        match outcome {
            Ok(Ok(_)) => {}
            Ok(Err(err)) => warn!(error = %err, "drain pass returned an error"),
            Err(panic) => {
                warn!(?panic, "worker drain pass panicked, failing in-flight jobs");
                if let Err(err) = job_status.mark_all_nonterminal_failed("worker crashed", &clock) {
                    warn!(error = %err, "failed to mark in-flight jobs failed after crash");
                }
            }
        }
    });
}

/// `GET /api/progress/{job_id}` (spec.md §4.5.1, §6).
async fn progress<C: Clock>(
    State(state): State<AppState<C>>,
    Path(job_id): Path<String>,
) -> Result<Json<ProgressResponse>, ServerError> {
    let status = state
        .worker
        .deps
        .job_status
        .get(&job_id)?
        .ok_or_else(|| ServerError::UnknownJob(job_id.clone()))?;

    let clock = state.clock();
    let mut response = ProgressResponse::from_status(&status, clock.now_utc());
    response.timeout_warning = status.timeout_warning(clock);
    Ok(Json(response))
}

/// `POST /api/cancel/{job_id}` (spec.md §4.5.1, §6).
async fn cancel<C: Clock>(
    State(state): State<AppState<C>>,
    Path(job_id): Path<String>,
) -> Result<Json<CancelResponse>, ServerError> {
    let mut status = state
        .worker
        .deps
        .job_status
        .get(&job_id)?
        .ok_or_else(|| ServerError::UnknownJob(job_id.clone()))?;

    status.request_cancel("user requested", state.clock())?;
    state.worker.deps.job_status.save(&status)?;

    Ok(Json(CancelResponse { success: true, job_id }))
}

/// `GET /api/episodes?user_id=` (spec.md §4.5.1, §6).
async fn episodes<C: Clock>(
    State(state): State<AppState<C>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<EpisodeSummary>>, ServerError> {
    let user_id = params.get("user_id").cloned().unwrap_or_else(|| "default".to_string());
    let episodes = state.worker.deps.episodes.list(&user_id)?;
    Ok(Json(episodes.iter().map(EpisodeSummary::from).collect()))
}

/// `GET /api/qrcode?user_id=` (spec.md §6, `qrcode_utils.py`
/// `generate_feed_qr_payload`).
async fn qrcode_handler<C: Clock>(
    State(state): State<AppState<C>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Json<QrCodeResponse> {
    let user_id = params.get("user_id").cloned().unwrap_or_else(|| "default".to_string());
    let base = headers
        .get(axum::http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(|host| format!("http://{host}"))
        .unwrap_or_else(|| state.base_url.to_string());
    let rss_url = format!("{}/episodes/{}/feed.xml", base.trim_end_matches('/'), user_id);

    let (apple_podcasts_url, qr_code) = qrcode::feed_qr_payload(state.qrcode.as_ref(), &rss_url);
    Json(QrCodeResponse { rss_url, apple_podcasts_url, qr_code: qr_code.unwrap_or_default() })
}

/// `GET /health` — bare liveness probe.
async fn health<C: Clock>(State(_state): State<AppState<C>>) -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok", ..Default::default() })
}

/// `GET /health/worker` (`original_source/src/health_checker.py`
/// `get_worker_status`): lock-file presence plus the worker log's last line.
async fn health_worker<C: Clock>(State(state): State<AppState<C>>) -> Json<HealthResponse> {
    let lock_held = state.worker.deps.root.worker_lock_path().exists();
    Json(HealthResponse {
        status: "ok",
        worker: Some(WorkerHealth { lock_held, last_log_line: None }),
        ..Default::default()
    })
}

/// `GET /health/system` (`health_checker.py` `get_system_resources`,
/// narrowed to queue + episode counts — no crate in this corpus's stack
/// does OS-level memory/disk sampling).
async fn health_system<C: Clock>(State(state): State<AppState<C>>) -> Result<Json<HealthResponse>, ServerError> {
    Ok(Json(HealthResponse {
        status: "ok",
        queue: Some(queue_health(&state)?),
        episodes: Some(episodes_health(&state)?),
        ..Default::default()
    }))
}

/// `GET /health/full` (`health_checker.py` `get_full_health`): combines all
/// of the above.
async fn health_full<C: Clock>(State(state): State<AppState<C>>) -> Result<Json<HealthResponse>, ServerError> {
    let lock_held = state.worker.deps.root.worker_lock_path().exists();
    Ok(Json(HealthResponse {
        status: "ok",
        worker: Some(WorkerHealth { lock_held, last_log_line: None }),
        queue: Some(queue_health(&state)?),
        episodes: Some(episodes_health(&state)?),
        uptime_seconds: None,
    }))
}

fn queue_health<C: Clock>(state: &AppState<C>) -> Result<QueueHealth, ServerError> {
    let root = &state.worker.deps.root;
    Ok(QueueHealth {
        pending: state.worker.deps.queue.list_pending()?.len(),
        processed: count_json_files(&root.processed_dir()),
        failed: count_json_files(&root.failed_dir()),
    })
}

fn episodes_health<C: Clock>(state: &AppState<C>) -> Result<crate::dto::EpisodesHealth, ServerError> {
    // No per-user index at the server layer; approximate with the default
    // user's catalog, matching the source's single-tenant health view.
    let episodes = state.worker.deps.episodes.list("default")?;
    let total_size_mb: f64 = episodes.iter().map(|e| e.size_mb()).sum();
    let total_duration_hours: f64 = episodes.iter().map(|e| e.duration_seconds).sum::<f64>() / 3600.0;
    let latest_episode = episodes.first().map(|e| e.id.clone());
    Ok(crate::dto::EpisodesHealth {
        total_episodes: episodes.len(),
        total_size_mb,
        total_duration_hours,
        latest_episode,
    })
}

fn count_json_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("json"))
                .count()
        })
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
