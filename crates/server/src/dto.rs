//! Wire DTOs for the Ingest HTTP surface (spec.md §6).

use echocast_core::{Episode, JobErrorDetail, JobResult, JobState, JobStatus, TtsOptions};
use serde::{Deserialize, Serialize};

/// `POST /api/generate` request body (spec.md §6).
///
/// `raw_text` is not named by spec.md's wire table, but resolves the spec's
/// own "non-empty URL or explicit raw-input marker" language (§4.5.1) the
/// same way `original_source/src/api_routes.py`'s `url or "manual_input"`
/// fallback gestures at, without inventing a sentinel URL string.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub raw_text: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub llm_model: Option<String>,
    #[serde(default)]
    pub tts_model: Option<String>,
    #[serde(default)]
    pub need_summary: Option<bool>,
    #[serde(default)]
    pub tts_config: Option<TtsOptions>,
    #[serde(default)]
    pub prompt_text: Option<String>,
    #[serde(default)]
    pub nlp_texts: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub job_id: String,
}

/// `GET /api/progress/{job_id}` response (spec.md §6).
#[derive(Debug, Clone, Serialize)]
pub struct ProgressResponse {
    pub job_id: String,
    pub status: JobState,
    pub progress: u8,
    pub message: String,
    pub stage: Option<String>,
    pub elapsed_time: Option<f64>,
    pub result: Option<JobResult>,
    pub error: Option<JobErrorDetail>,
    pub cancelled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_warning: Option<String>,
}

impl ProgressResponse {
    pub fn from_status(status: &JobStatus, now: chrono::DateTime<chrono::Utc>) -> Self {
        let elapsed_time = status
            .stage_start_time
            .map(|started| (now - started).num_milliseconds() as f64 / 1000.0);
        Self {
            job_id: status.id.clone(),
            status: status.status,
            progress: status.progress,
            message: status.message.clone(),
            stage: status.stage.map(|s| s.to_string()),
            elapsed_time,
            result: status.result.clone(),
            error: status.error.clone(),
            cancelled: status.cancelled,
            timeout_warning: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelResponse {
    pub success: bool,
    pub job_id: String,
}

/// One entry of `GET /api/episodes?user_id=` (spec.md §6).
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeSummary {
    pub id: String,
    pub title: String,
    pub audio_file: String,
    pub created: chrono::DateTime<chrono::Utc>,
    pub size_mb: f64,
    pub duration: f64,
}

impl From<&Episode> for EpisodeSummary {
    fn from(episode: &Episode) -> Self {
        Self {
            id: episode.id.clone(),
            title: episode.title.clone(),
            audio_file: episode.audio_file.clone(),
            created: episode.created_at,
            size_mb: episode.size_mb(),
            duration: episode.duration_seconds,
        }
    }
}

/// `GET /api/qrcode?user_id=` response (spec.md §6, grounded on
/// `original_source/src/qrcode_utils.py`'s `generate_feed_qr_payload`).
#[derive(Debug, Clone, Serialize)]
pub struct QrCodeResponse {
    pub rss_url: String,
    pub apple_podcasts_url: String,
    pub qr_code: String,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker: Option<WorkerHealth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<QueueHealth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episodes: Option<EpisodesHealth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime_seconds: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkerHealth {
    pub lock_held: bool,
    pub last_log_line: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueueHealth {
    pub pending: usize,
    pub processed: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EpisodesHealth {
    pub total_episodes: usize,
    pub total_size_mb: f64,
    pub total_duration_hours: f64,
    pub latest_episode: Option<String>,
}
