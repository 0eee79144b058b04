//! Job Ticket — the durable queue entry (spec.md §3, §4.2).

use crate::provider::TtsOptions;
use serde::{Deserialize, Serialize};

/// The work a ticket asks for: either fetch a URL, or use already-supplied
/// raw text (spec.md §1 "URLs or raw text").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum JobInput {
    Url(String),
    RawText(String),
}

impl JobInput {
    pub fn as_url(&self) -> Option<&str> {
        match self {
            JobInput::Url(u) => Some(u),
            JobInput::RawText(_) => None,
        }
    }
}

/// A durable queue entry: the intent to produce one episode (spec.md §3).
///
/// One JSON file per ticket, named `<queue_id>.json`, living in exactly one
/// of `queue/`, `processed/`, `failed/` at any instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobTicket {
    /// Sortable timestamp + random suffix; also the on-disk filename stem.
    pub queue_id: String,
    pub job_id: String,
    pub user_id: String,
    pub input: JobInput,
    #[serde(default)]
    pub llm_choice: Option<String>,
    #[serde(default)]
    pub tts_choice: Option<String>,
    #[serde(default)]
    pub tts_options: TtsOptions,
    pub need_summary: bool,
    #[serde(default)]
    pub retry_count: u32,
    pub max_retries: u32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Set by `mark_failed` when the ticket is moved into `failed/`.
    #[serde(default)]
    pub failed_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl JobTicket {
    pub fn new(
        queue_id: impl Into<String>,
        job_id: impl Into<String>,
        user_id: impl Into<String>,
        input: JobInput,
        need_summary: bool,
        max_retries: u32,
        created_at: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            queue_id: queue_id.into(),
            job_id: job_id.into(),
            user_id: user_id.into(),
            input,
            llm_choice: None,
            tts_choice: None,
            tts_options: TtsOptions::default(),
            need_summary,
            retry_count: 0,
            max_retries,
            created_at,
            failed_at: None,
            error: None,
        }
    }

    crate::setters! {
        option {
            llm_choice: String,
            tts_choice: String,
        }
        set {
            tts_options: TtsOptions,
        }
    }
}
