//! Episode Catalog (spec.md §4.4): per-user `metadata.json` with FIFO
//! retention.

use crate::error::StorageError;
use crate::paths::DataRoot;
use echocast_core::Episode;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::info;

/// Per-user catalog cap (spec.md §4.4 "at most 10 episodes per user").
pub const RETENTION_CAP: usize = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Metadata {
    #[serde(default)]
    episodes: Vec<Episode>,
}

#[derive(Debug, Clone)]
pub struct EpisodeCatalog {
    root: DataRoot,
}

impl EpisodeCatalog {
    pub fn new(root: DataRoot) -> Self {
        Self { root }
    }

    fn load(&self, user_id: &str) -> Result<Metadata, StorageError> {
        Ok(echocast_core::atomic::read_json(&self.root.metadata_path(user_id))?.unwrap_or_default())
    }

    fn save(&self, user_id: &str, metadata: &Metadata) -> Result<(), StorageError> {
        echocast_core::atomic::write_json_atomic(&self.root.metadata_path(user_id), metadata)?;
        Ok(())
    }

    /// Insert `episode` at the front of the user's catalog (newest first,
    /// spec.md §4.4). If the catalog now exceeds `RETENTION_CAP`, the
    /// oldest entry (the tail) is evicted and its audio/script files
    /// deleted from disk.
    ///
    /// Re-adding an id already present (possible under at-least-once job
    /// execution; spec.md §9) replaces the existing entry in place rather
    /// than inserting a duplicate.
    pub fn add(&self, user_id: &str, episode: Episode) -> Result<(), StorageError> {
        let mut metadata = self.load(user_id)?;

        if let Some(existing) = metadata.episodes.iter_mut().find(|e| e.id == episode.id) {
            *existing = episode;
        } else {
            metadata.episodes.insert(0, episode);
        }

        while metadata.episodes.len() > RETENTION_CAP {
            let Some(evicted) = metadata.episodes.pop() else { break };
            self.delete_files(user_id, &evicted);
            info!(%user_id, episode_id = %evicted.id, "evicted episode past retention cap");
        }

        self.save(user_id, &metadata)
    }

    pub fn list(&self, user_id: &str) -> Result<Vec<Episode>, StorageError> {
        Ok(self.load(user_id)?.episodes)
    }

    pub fn get(&self, user_id: &str, episode_id: &str) -> Result<Option<Episode>, StorageError> {
        Ok(self.load(user_id)?.episodes.into_iter().find(|e| e.id == episode_id))
    }

    /// Replace an existing episode's metadata in place (e.g. after
    /// re-transcoding audio). No-op if the id isn't present.
    pub fn update(&self, user_id: &str, episode: Episode) -> Result<(), StorageError> {
        let mut metadata = self.load(user_id)?;
        match metadata.episodes.iter_mut().find(|e| e.id == episode.id) {
            Some(existing) => {
                *existing = episode;
                self.save(user_id, &metadata)
            }
            None => Err(StorageError::EpisodeNotFound(episode.id)),
        }
    }

    pub fn delete(&self, user_id: &str, episode_id: &str) -> Result<(), StorageError> {
        let mut metadata = self.load(user_id)?;
        let pos = metadata
            .episodes
            .iter()
            .position(|e| e.id == episode_id)
            .ok_or_else(|| StorageError::EpisodeNotFound(episode_id.to_string()))?;
        let removed = metadata.episodes.remove(pos);
        self.delete_files(user_id, &removed);
        self.save(user_id, &metadata)
    }

    fn delete_files(&self, user_id: &str, episode: &Episode) {
        let audio = self.root.user_dir(user_id).join(&episode.audio_file);
        let _ = fs::remove_file(audio);
        let script = self.root.script_path(user_id, &episode.id);
        let _ = fs::remove_file(script);
    }

    /// Scan `episodes/<user_id>/` for audio files with no corresponding
    /// `metadata.json` entry (a catalog created before `metadata.json`
    /// existed, or a file dropped in by hand) and register them, inferring
    /// `title` from the filename stem and `size_bytes` from the file.
    ///
    /// Backs the `migrate-episodes` CLI subcommand; returns the number of
    /// episodes adopted.
    pub fn migrate_legacy(&self, user_id: &str) -> Result<usize, StorageError> {
        let dir = self.root.user_dir(user_id);
        if !dir.exists() {
            return Ok(0);
        }
        let mut metadata = self.load(user_id)?;
        let known: std::collections::HashSet<String> =
            metadata.episodes.iter().map(|e| e.audio_file.clone()).collect();

        let mut adopted = 0;
        let entries = fs::read_dir(&dir).map_err(|e| {
            StorageError::Io(echocast_core::AtomicIoError::Io { path: dir.clone(), source: e })
        })?;
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else { continue };
            if !matches!(ext, "mp3" | "wav" | "ogg") {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else { continue };
            if known.contains(file_name) {
                continue;
            }
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("episode").to_string();
            let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
            let created_at = entry
                .metadata()
                .and_then(|m| m.created().or_else(|_| m.modified()))
                .map(chrono::DateTime::<chrono::Utc>::from)
                .unwrap_or_else(chrono::Utc::now);

            metadata.episodes.push(Episode {
                id: stem.clone(),
                title: stem,
                created_at,
                audio_file: file_name.to_string(),
                size_bytes,
                duration_seconds: 0.0,
                source_url: None,
                tokens_used: None,
                providers_used: Default::default(),
                stage_timings: Default::default(),
            });
            adopted += 1;
        }

        metadata.episodes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        while metadata.episodes.len() > RETENTION_CAP {
            let Some(evicted) = metadata.episodes.pop() else { break };
            self.delete_files(user_id, &evicted);
        }
        self.save(user_id, &metadata)?;
        Ok(adopted)
    }
}

#[cfg(test)]
#[path = "episode_catalog_tests.rs"]
mod tests;
