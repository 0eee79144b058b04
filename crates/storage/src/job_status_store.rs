//! Job Status Store (spec.md §4.3): `jobs/<job_id>.json`, one file per job.
//!
//! Writes are atomic (temp file + rename, via `echocast_core::atomic`).
//! Reads are backed by an in-process cache: if a read happens to observe a
//! half-written or corrupted file (a reader racing a concurrent rename that
//! the atomic-rename protocol is supposed to make impossible, but defense in
//! depth costs little here) the store falls back to the last known-good
//! in-memory copy rather than surfacing the parse error to the caller.

use crate::error::StorageError;
use crate::paths::DataRoot;
use echocast_core::{Clock, JobErrorDetail, JobStatus};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct JobStatusStore {
    root: DataRoot,
    cache: Arc<Mutex<HashMap<String, JobStatus>>>,
}

impl JobStatusStore {
    pub fn new(root: DataRoot) -> Self {
        Self { root, cache: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Persist `status` to disk and update the cache.
    pub fn save(&self, status: &JobStatus) -> Result<(), StorageError> {
        let path = self.root.job_status_path(&status.id);
        echocast_core::atomic::write_json_atomic(&path, status)?;
        self.cache.lock().insert(status.id.clone(), status.clone());
        Ok(())
    }

    /// Fetch a job's status. On a parse failure, falls back to the cached
    /// copy (spec.md §4.3) rather than erroring, logging the anomaly;
    /// `Ok(None)` only if neither disk nor cache has the job.
    pub fn get(&self, job_id: &str) -> Result<Option<JobStatus>, StorageError> {
        let path = self.root.job_status_path(job_id);
        match echocast_core::atomic::read_json::<JobStatus>(&path) {
            Ok(Some(status)) => {
                self.cache.lock().insert(job_id.to_string(), status.clone());
                Ok(Some(status))
            }
            Ok(None) => Ok(self.cache.lock().get(job_id).cloned()),
            Err(err) => {
                warn!(%job_id, error = %err, "job status file failed to parse, serving cached copy");
                Ok(self.cache.lock().get(job_id).cloned())
            }
        }
    }

    /// Like `get`, but returns `StorageError::JobNotFound` when absent.
    pub fn require(&self, job_id: &str) -> Result<JobStatus, StorageError> {
        self.get(job_id)?.ok_or_else(|| StorageError::JobNotFound(job_id.to_string()))
    }

    pub fn exists(&self, job_id: &str) -> bool {
        self.root.job_status_path(job_id).exists() || self.cache.lock().contains_key(job_id)
    }

    /// Scan `jobs/*.json` and fail every non-terminal job with `message`
    /// (spec.md §4.5.2 step 2, "If the pass crashes, marks all non-terminal
    /// Job Statuses as FAILED"). Returns the number of jobs failed.
    pub fn mark_all_nonterminal_failed(
        &self,
        message: &str,
        clock: &impl Clock,
    ) -> Result<usize, StorageError> {
        let dir = self.root.jobs_dir();
        std::fs::create_dir_all(&dir)
            .map_err(|e| StorageError::Io(echocast_core::AtomicIoError::Io { path: dir.clone(), source: e }))?;
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| StorageError::Io(echocast_core::AtomicIoError::Io { path: dir.clone(), source: e }))?;

        let mut failed = 0;
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else { continue };
            let Some(mut status) = self.get(stem)? else { continue };
            if status.status.is_terminal() {
                continue;
            }
            status.fail(JobErrorDetail { stage: "worker".to_string(), message: message.to_string() }, clock);
            self.save(&status)?;
            failed += 1;
        }
        Ok(failed)
    }
}

#[cfg(test)]
#[path = "job_status_store_tests.rs"]
mod tests;
