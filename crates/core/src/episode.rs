//! Episode — a finalized audio artifact in a user's catalog (spec.md §3, §4.4).

use crate::job_status::ProvidersUsed;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-stage wall-clock timings recorded for a completed job, useful for
/// auditing and for the `/api/episodes` response's implicit "how long did
/// this take" story.
pub type StageTimings = HashMap<String, f64>;

/// A finalized episode (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Timestamp-based id (`YYYYMMDD_HHMMSS`), shared with the audio/script
    /// filename stems.
    pub id: String,
    pub title: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Filename only (not a full path) — `<id>.<ext>` under the user's
    /// episode directory.
    pub audio_file: String,
    pub size_bytes: u64,
    pub duration_seconds: f64,
    pub source_url: Option<String>,
    pub tokens_used: Option<u32>,
    #[serde(default)]
    pub providers_used: ProvidersUsed,
    #[serde(default)]
    pub stage_timings: StageTimings,
}

impl Episode {
    /// Megabyte-rounded size for the `/api/episodes` wire response
    /// (spec.md §6 shows `size_mb`).
    pub fn size_mb(&self) -> f64 {
        (self.size_bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
    }
}
