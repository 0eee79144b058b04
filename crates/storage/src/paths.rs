//! Filesystem layout (spec.md §6 "Filesystem layout (authoritative state)").
//!
//! ```text
//! <root>/logs/worker.lock
//! <root>/logs/queue/<queue_id>.json
//! <root>/logs/processed/<queue_id>.json
//! <root>/logs/failed/<queue_id>.json
//! <root>/logs/jobs/<job_id>.json
//! <root>/episodes/<user_id>/metadata.json
//! <root>/episodes/<user_id>/<episode_id>.<ext>
//! <root>/episodes/<user_id>/<episode_id>.txt
//! <root>/episodes/<user_id>/feed.xml
//! ```

use std::path::{Path, PathBuf};

/// Root of all on-disk state. Cheap to clone (one `PathBuf`).
#[derive(Debug, Clone)]
pub struct DataRoot {
    root: PathBuf,
}

impl DataRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn worker_lock_path(&self) -> PathBuf {
        self.logs_dir().join("worker.lock")
    }

    pub fn queue_dir(&self) -> PathBuf {
        self.logs_dir().join("queue")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.logs_dir().join("processed")
    }

    pub fn failed_dir(&self) -> PathBuf {
        self.logs_dir().join("failed")
    }

    pub fn jobs_dir(&self) -> PathBuf {
        self.logs_dir().join("jobs")
    }

    pub fn job_status_path(&self, job_id: &str) -> PathBuf {
        self.jobs_dir().join(format!("{job_id}.json"))
    }

    pub fn episodes_dir(&self) -> PathBuf {
        self.root.join("episodes")
    }

    pub fn user_dir(&self, user_id: &str) -> PathBuf {
        self.episodes_dir().join(user_id)
    }

    pub fn metadata_path(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("metadata.json")
    }

    pub fn feed_path(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("feed.xml")
    }

    pub fn audio_path(&self, user_id: &str, episode_id: &str, ext: &str) -> PathBuf {
        self.user_dir(user_id).join(format!("{episode_id}.{ext}"))
    }

    pub fn script_path(&self, user_id: &str, episode_id: &str) -> PathBuf {
        self.user_dir(user_id).join(format!("{episode_id}.txt"))
    }
}
