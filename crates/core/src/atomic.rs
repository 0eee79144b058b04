//! Write-to-temp + rename primitives.
//!
//! Every on-disk document in this system (queue tickets, job status, episode
//! metadata) is written this way so a reader never observes a partial file
//! (spec.md §5 "a progress read... must not observe a partial write").
//! Grounded on the teacher's snapshot/WAL persistence style
//! (`crates/daemon/src/storage/snapshot.rs`, `lifecycle/startup.rs`'s
//! truncate-after-lock discipline), adapted to serde_json instead of the
//! teacher's zstd-framed WAL records.

use crate::error::AtomicIoError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Serialize `value` as indented UTF-8 JSON and atomically replace `path`.
///
/// Writes to a sibling `.tmp-<random>` file in the same directory (so the
/// final rename is same-filesystem and therefore atomic on POSIX), then
/// renames over `path`. A crash between the write and the rename leaves
/// only the temp file behind; `path` itself is never observed half-written.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), AtomicIoError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|source| AtomicIoError::Io { path: dir.to_path_buf(), source })?;

    let tmp_name = format!(".tmp-{}", nanoid::nanoid!(8));
    let tmp_path = dir.join(tmp_name);

    let json = serde_json::to_vec_pretty(value)
        .map_err(|source| AtomicIoError::Json { path: path.to_path_buf(), source })?;

    let write_result = (|| -> std::io::Result<()> {
        let mut f = fs::File::create(&tmp_path)?;
        f.write_all(&json)?;
        f.sync_all()?;
        Ok(())
    })();

    if let Err(source) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(AtomicIoError::Io { path: tmp_path, source });
    }

    fs::rename(&tmp_path, path).map_err(|source| AtomicIoError::Io { path: path.to_path_buf(), source })
}

/// Read and parse a JSON document. Returns `Ok(None)` if the file does not
/// exist (callers decide whether that's an error); a parse failure is
/// surfaced to the caller, which (per spec.md §4.3) should fall back to its
/// last cached value rather than propagate the error to the client.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, AtomicIoError> {
    match fs::read(path) {
        Ok(bytes) => {
            let value = serde_json::from_slice(&bytes)
                .map_err(|source| AtomicIoError::Json { path: path.to_path_buf(), source })?;
            Ok(Some(value))
        }
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(AtomicIoError::Io { path: path.to_path_buf(), source }),
    }
}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
