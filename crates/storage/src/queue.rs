//! Queue Store (spec.md §4.2): the filesystem-backed job ticket queue.
//!
//! Three sibling directories, `queue/`, `processed/`, `failed/`; one JSON
//! file per ticket. Because there is only ever one worker (enforced by the
//! `logs/worker.lock` file lock the engine crate takes), no per-file claim
//! lock is needed here — `add` is the only operation the Ingest Server
//! performs, and it's a plain atomic write.

use crate::error::StorageError;
use crate::paths::DataRoot;
use chrono::Utc;
use echocast_core::{new_queue_id, Clock, JobTicket};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A pending ticket together with the path it was read from, so callers can
/// hand the path straight to `mark_processed`/`mark_failed`/`retry` without
/// re-deriving it.
#[derive(Debug, Clone)]
pub struct PendingTicket {
    pub ticket: JobTicket,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct QueueStore {
    root: DataRoot,
}

impl QueueStore {
    pub fn new(root: DataRoot) -> Self {
        Self { root }
    }

    /// Write `queue/<queue_id>.json` atomically. Returns the ticket's
    /// `queue_id`.
    pub fn add(&self, ticket: &JobTicket) -> Result<String, StorageError> {
        let path = self.root.queue_dir().join(format!("{}.json", ticket.queue_id));
        echocast_core::atomic::write_json_atomic(&path, ticket)?;
        Ok(ticket.queue_id.clone())
    }

    /// Enumerate `queue/*.json` sorted by filename, which (by construction,
    /// spec.md §6) equals chronological order.
    pub fn list_pending(&self) -> Result<Vec<PendingTicket>, StorageError> {
        list_tickets_sorted(&self.root.queue_dir())
    }

    /// Rename a ticket's file into `processed/`.
    pub fn mark_processed(&self, path: &Path) -> Result<(), StorageError> {
        let dest = self.root.processed_dir().join(file_name_of(path));
        fs::create_dir_all(self.root.processed_dir())
            .map_err(|e| io_err(&self.root.processed_dir(), e))?;
        fs::rename(path, &dest).map_err(|e| io_err(path, e))?;
        Ok(())
    }

    /// Attach `failed_at`/`error`, write into `failed/`, delete the original.
    pub fn mark_failed(&self, path: &Path, error_text: &str, clock: &impl Clock) -> Result<(), StorageError> {
        let mut ticket: JobTicket = echocast_core::atomic::read_json(path)?
            .ok_or_else(|| StorageError::TicketNotFound(path.to_path_buf()))?;
        ticket.failed_at = Some(clock.now_utc());
        ticket.error = Some(error_text.to_string());
        let dest = self.root.failed_dir().join(file_name_of(path));
        echocast_core::atomic::write_json_atomic(&dest, &ticket)?;
        fs::remove_file(path).map_err(|e| io_err(path, e))?;
        warn!(queue_id = %ticket.queue_id, error = %error_text, "ticket moved to failed/");
        Ok(())
    }

    /// Increment `retry_count`; if within `max_retries`, re-add under a
    /// fresh `queue_id` and remove the original, returning the new id.
    /// Otherwise hands off to `mark_failed` and returns `None`.
    pub fn retry(
        &self,
        path: &Path,
        error_text: &str,
        clock: &impl Clock,
    ) -> Result<Option<String>, StorageError> {
        let mut ticket: JobTicket = echocast_core::atomic::read_json(path)?
            .ok_or_else(|| StorageError::TicketNotFound(path.to_path_buf()))?;
        ticket.retry_count += 1;
        if ticket.retry_count > ticket.max_retries {
            self.mark_failed(path, error_text, clock)?;
            return Ok(None);
        }
        ticket.queue_id = new_queue_id(clock);
        ticket.created_at = clock.now_utc();
        let new_id = self.add(&ticket)?;
        fs::remove_file(path).map_err(|e| io_err(path, e))?;
        info!(job_id = %ticket.job_id, retry_count = ticket.retry_count, "ticket requeued");
        Ok(Some(new_id))
    }

    /// Delete `processed/*.json` older than `keep_days`.
    pub fn prune_processed(&self, keep_days: i64) -> Result<usize, StorageError> {
        let cutoff = Utc::now() - chrono::Duration::days(keep_days);
        let mut pruned = 0;
        for pending in list_tickets_sorted(&self.root.processed_dir())? {
            if pending.ticket.created_at < cutoff {
                if fs::remove_file(&pending.path).is_ok() {
                    pruned += 1;
                }
            }
        }
        Ok(pruned)
    }
}

fn list_tickets_sorted(dir: &Path) -> Result<Vec<PendingTicket>, StorageError> {
    fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    entries.sort();

    let mut out = Vec::with_capacity(entries.len());
    for path in entries {
        if let Some(ticket) = echocast_core::atomic::read_json(&path)? {
            out.push(PendingTicket { ticket, path });
        }
    }
    Ok(out)
}

fn file_name_of(path: &Path) -> PathBuf {
    PathBuf::from(path.file_name().unwrap_or_default())
}

fn io_err(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io(echocast_core::AtomicIoError::Io { path: path.to_path_buf(), source })
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
