//! Job status state machine (spec.md §4.3).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Wire status enum. Variant order mirrors the DAG in spec.md §4.3; the
/// `serde(rename_all = "snake_case")` attribute produces the exact wire
/// strings the HTTP API contract requires (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Queued,
    Processing,
    Fetching,
    LlmProcessing,
    TtsGenerating,
    Completed,
    Failed,
    Cancelled,
    Timeout,
}

crate::simple_display! {
    JobState {
        Pending => "pending",
        Queued => "queued",
        Processing => "processing",
        Fetching => "fetching",
        LlmProcessing => "llm_processing",
        TtsGenerating => "tts_generating",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
        Timeout => "timeout",
    }
}

impl JobState {
    /// Terminal states never mutate further (spec.md §3 invariants).
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed | JobState::Cancelled | JobState::Timeout)
    }

    /// States from which a `cancel` request is honored (spec.md §4.3).
    pub fn is_cancellable(self) -> bool {
        matches!(
            self,
            JobState::Pending
                | JobState::Queued
                | JobState::Processing
                | JobState::Fetching
                | JobState::LlmProcessing
                | JobState::TtsGenerating
        )
    }
}

/// The pipeline stage a running job is currently in, used for per-stage
/// timeout budgets (spec.md §4.3 "Timeout policy"). A strict subset of
/// `JobState` — only the states that represent in-flight work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Fetching,
    LlmProcessing,
    TtsGenerating,
}

crate::simple_display! {
    StageKind {
        Fetching => "fetching",
        LlmProcessing => "llm_processing",
        TtsGenerating => "tts_generating",
    }
}

impl StageKind {
    /// Per-stage timeout budget (spec.md §4.3).
    pub fn budget(self) -> Duration {
        match self {
            StageKind::Fetching => Duration::from_secs(60),
            StageKind::LlmProcessing => Duration::from_secs(300),
            StageKind::TtsGenerating => Duration::from_secs(600),
        }
    }

    pub fn as_job_state(self) -> JobState {
        match self {
            StageKind::Fetching => JobState::Fetching,
            StageKind::LlmProcessing => JobState::LlmProcessing,
            StageKind::TtsGenerating => JobState::TtsGenerating,
        }
    }
}

/// One entry in a job's stage history (spec.md §3 "per-stage history").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
    pub progress_at_start: u8,
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
