//! Job Status — the live, observable state of a ticket (spec.md §3, §4.3).

use crate::clock::Clock;
use crate::status::{JobState, StageKind, StageRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The `result` object populated on `COMPLETED` (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    pub audio_url: String,
    pub episode_id: String,
    pub title: String,
    pub duration_seconds: f64,
    pub tokens_used: Option<u32>,
    pub providers_used: ProvidersUsed,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProvidersUsed {
    pub llm: Option<String>,
    pub tts: Option<String>,
}

/// The `error` / `error_details` pair surfaced on `FAILED`/`TIMEOUT`
/// (spec.md §7 "User-visible failure").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobErrorDetail {
    pub stage: String,
    pub message: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CancelError {
    #[error("cannot cancel job in status {0}")]
    NotCancellable(JobState),
}

/// One JSON file `jobs/<job_id>.json` per job (spec.md §4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatus {
    pub id: String,
    pub url: Option<String>,
    pub user_id: String,
    pub status: JobState,
    /// Monotonically non-decreasing within one run; a retry resets it.
    pub progress: u8,
    pub message: String,
    /// `None` until the worker picks the job up.
    pub stage: Option<StageKind>,
    pub stage_start_time: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub stage_history: Vec<StageRecord>,
    pub result: Option<JobResult>,
    pub error: Option<JobErrorDetail>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub cancelled: bool,
}

impl JobStatus {
    pub fn new_pending(
        id: impl Into<String>,
        user_id: impl Into<String>,
        url: Option<String>,
        clock: &impl Clock,
    ) -> Self {
        let now = clock.now_utc();
        Self {
            id: id.into(),
            url,
            user_id: user_id.into(),
            status: JobState::Pending,
            progress: 0,
            message: "job created".to_string(),
            stage: None,
            stage_start_time: None,
            stage_history: Vec::new(),
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
            cancelled: false,
        }
    }

    /// Mutate status/progress/message, but only if not already terminal
    /// (spec.md §3 invariant: terminal states allow no further mutation).
    fn transition(
        &mut self,
        status: JobState,
        progress: u8,
        message: impl Into<String>,
        clock: &impl Clock,
    ) {
        if self.status.is_terminal() {
            return;
        }
        debug_assert!(progress >= self.progress, "progress must be monotone");
        self.status = status;
        self.progress = progress.max(self.progress);
        self.message = message.into();
        self.updated_at = clock.now_utc();
    }

    pub fn set_queued(&mut self, clock: &impl Clock) {
        self.transition(JobState::Queued, 5, "queued", clock);
    }

    pub fn set_processing(&mut self, clock: &impl Clock) {
        self.transition(JobState::Processing, 10, "processing started", clock);
    }

    /// Enter a new pipeline stage, closing out the previous stage's history
    /// record if one is open.
    pub fn enter_stage(
        &mut self,
        stage: StageKind,
        progress: u8,
        message: impl Into<String>,
        clock: &impl Clock,
    ) {
        if self.status.is_terminal() {
            return;
        }
        let now = clock.now_utc();
        if let Some(last) = self.stage_history.last_mut() {
            if last.finished_at.is_none() {
                last.finished_at = Some(now);
            }
        }
        self.stage = Some(stage);
        self.stage_start_time = Some(now);
        self.stage_history.push(StageRecord {
            stage: stage.to_string(),
            started_at: now,
            finished_at: None,
            progress_at_start: self.progress,
        });
        self.transition(stage.as_job_state(), progress, message, clock);
    }

    pub fn complete(&mut self, result: JobResult, clock: &impl Clock) {
        if self.status.is_terminal() {
            return;
        }
        let now = clock.now_utc();
        if let Some(last) = self.stage_history.last_mut() {
            if last.finished_at.is_none() {
                last.finished_at = Some(now);
            }
        }
        self.result = Some(result);
        self.status = JobState::Completed;
        self.progress = 100;
        self.message = "completed".to_string();
        self.updated_at = now;
        self.completed_at = Some(now);
    }

    pub fn fail(&mut self, error: JobErrorDetail, clock: &impl Clock) {
        if self.status.is_terminal() {
            return;
        }
        let now = clock.now_utc();
        self.message = format!("failed: {}", error.message);
        self.error = Some(error);
        self.status = JobState::Failed;
        self.updated_at = now;
        self.completed_at = Some(now);
    }

    pub fn timeout(&mut self, error: JobErrorDetail, clock: &impl Clock) {
        if self.status.is_terminal() {
            return;
        }
        let now = clock.now_utc();
        self.message = format!("timed out: {}", error.message);
        self.error = Some(error);
        self.status = JobState::Timeout;
        self.updated_at = now;
        self.completed_at = Some(now);
    }

    /// spec.md §4.3 `cancel(job_id, reason)`: only valid from a non-terminal
    /// status; sets the `cancelled` flag immediately (checked by the worker
    /// at stage boundaries) and flips status only if the job hasn't already
    /// reached a terminal state by the time this is observed.
    pub fn request_cancel(
        &mut self,
        reason: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), CancelError> {
        if !self.status.is_cancellable() {
            return Err(CancelError::NotCancellable(self.status));
        }
        self.cancelled = true;
        self.message = reason.into();
        self.updated_at = clock.now_utc();
        Ok(())
    }

    /// Called by the worker once it observes `cancelled` at a stage
    /// boundary; finalizes the terminal transition.
    pub fn finalize_cancel(&mut self, clock: &impl Clock) {
        if self.status.is_terminal() {
            return;
        }
        let now = clock.now_utc();
        if let Some(last) = self.stage_history.last_mut() {
            if last.finished_at.is_none() {
                last.finished_at = Some(now);
            }
        }
        self.status = JobState::Cancelled;
        self.updated_at = now;
        self.completed_at = Some(now);
    }

    /// Advisory timeout check for the progress-read endpoint (spec.md §4.3):
    /// does not mutate state.
    pub fn timeout_warning(&self, clock: &impl Clock) -> Option<String> {
        let stage = self.stage?;
        let started = self.stage_start_time?;
        let elapsed = (clock.now_utc() - started).to_std().ok()?;
        let budget = stage.budget();
        if elapsed > budget {
            Some(format!(
                "stage {} has been running for {}s, exceeding its {}s budget",
                stage,
                elapsed.as_secs(),
                budget.as_secs()
            ))
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "job_status_tests.rs"]
mod tests;
