//! Single-instance worker lock (spec.md §4.5.2, §5) — grounded on the
//! teacher's daemon startup lock (`crates/daemon/src/lifecycle/startup.rs`):
//! an advisory OS-level exclusive lock on a file, holding the owning
//! process's pid for observability.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Held for the duration of one drain pass. Dropping it releases the lock.
pub struct WorkerLock {
    file: File,
}

impl WorkerLock {
    /// Attempt to acquire the lock at `path`, creating parent directories
    /// and the file itself if needed. Returns `None` if another instance
    /// already holds it — callers should fail fast (spec.md §4.5.2 "fail
    /// fast if not obtained").
    pub fn try_acquire(path: &Path) -> std::io::Result<Option<Self>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().read(true).write(true).create(true).truncate(false).open(path)?;
        if file.try_lock_exclusive().is_err() {
            return Ok(None);
        }
        let mut file = file;
        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;
        Ok(Some(Self { file }))
    }
}

impl Drop for WorkerLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
