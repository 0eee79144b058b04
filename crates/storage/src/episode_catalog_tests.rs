use super::*;
use tempfile::tempdir;

fn episode(id: &str) -> Episode {
    Episode {
        id: id.to_string(),
        title: format!("Episode {id}"),
        created_at: chrono::Utc::now(),
        audio_file: format!("{id}.mp3"),
        size_bytes: 1024,
        duration_seconds: 60.0,
        source_url: Some("https://example.com".to_string()),
        tokens_used: Some(100),
        providers_used: Default::default(),
        stage_timings: Default::default(),
    }
}

#[test]
fn add_then_list_round_trips() {
    let dir = tempdir().unwrap();
    let catalog = EpisodeCatalog::new(DataRoot::new(dir.path()));
    catalog.add("alice", episode("ep1")).unwrap();

    let list = catalog.list("alice").unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, "ep1");
}

#[test]
fn get_returns_none_for_unknown_episode() {
    let dir = tempdir().unwrap();
    let catalog = EpisodeCatalog::new(DataRoot::new(dir.path()));
    assert!(catalog.get("alice", "missing").unwrap().is_none());
}

#[test]
fn readding_same_id_replaces_in_place_without_duplicate() {
    let dir = tempdir().unwrap();
    let catalog = EpisodeCatalog::new(DataRoot::new(dir.path()));
    catalog.add("alice", episode("ep1")).unwrap();
    let mut updated = episode("ep1");
    updated.title = "Re-run".to_string();
    catalog.add("alice", updated).unwrap();

    let list = catalog.list("alice").unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].title, "Re-run");
}

#[test]
fn retention_cap_evicts_oldest_and_keeps_newest_first() {
    let dir = tempdir().unwrap();
    let root = DataRoot::new(dir.path());
    let catalog = EpisodeCatalog::new(root.clone());
    std::fs::create_dir_all(root.user_dir("alice")).unwrap();

    for i in 0..(RETENTION_CAP + 3) {
        let id = format!("ep{i:02}");
        std::fs::write(root.audio_path("alice", &id, "mp3"), b"audio").unwrap();
        catalog.add("alice", episode(&id)).unwrap();
    }

    let list = catalog.list("alice").unwrap();
    assert_eq!(list.len(), RETENTION_CAP);
    assert_eq!(list[0].id, format!("ep{:02}", RETENTION_CAP + 2));
    assert_eq!(list[list.len() - 1].id, "ep03");
    assert!(!root.audio_path("alice", "ep00", "mp3").exists());
}

#[test]
fn delete_removes_entry_and_audio_file() {
    let dir = tempdir().unwrap();
    let root = DataRoot::new(dir.path());
    let catalog = EpisodeCatalog::new(root.clone());
    std::fs::create_dir_all(root.user_dir("alice")).unwrap();
    std::fs::write(root.audio_path("alice", "ep1", "mp3"), b"audio").unwrap();
    catalog.add("alice", episode("ep1")).unwrap();

    catalog.delete("alice", "ep1").unwrap();
    assert!(catalog.list("alice").unwrap().is_empty());
    assert!(!root.audio_path("alice", "ep1", "mp3").exists());
}

#[test]
fn delete_unknown_episode_errors() {
    let dir = tempdir().unwrap();
    let catalog = EpisodeCatalog::new(DataRoot::new(dir.path()));
    assert!(catalog.delete("alice", "missing").is_err());
}

#[test]
fn update_replaces_existing_metadata() {
    let dir = tempdir().unwrap();
    let catalog = EpisodeCatalog::new(DataRoot::new(dir.path()));
    catalog.add("alice", episode("ep1")).unwrap();
    let mut revised = episode("ep1");
    revised.duration_seconds = 120.0;
    catalog.update("alice", revised).unwrap();

    let fetched = catalog.get("alice", "ep1").unwrap().unwrap();
    assert_eq!(fetched.duration_seconds, 120.0);
}

#[test]
fn migrate_legacy_adopts_orphan_audio_files() {
    let dir = tempdir().unwrap();
    let root = DataRoot::new(dir.path());
    std::fs::create_dir_all(root.user_dir("alice")).unwrap();
    std::fs::write(root.audio_path("alice", "20260101_120000", "mp3"), b"audio").unwrap();

    let catalog = EpisodeCatalog::new(root);
    let adopted = catalog.migrate_legacy("alice").unwrap();
    assert_eq!(adopted, 1);

    let list = catalog.list("alice").unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].audio_file, "20260101_120000.mp3");
}

#[test]
fn migrate_legacy_is_idempotent() {
    let dir = tempdir().unwrap();
    let root = DataRoot::new(dir.path());
    std::fs::create_dir_all(root.user_dir("alice")).unwrap();
    std::fs::write(root.audio_path("alice", "20260101_120000", "mp3"), b"audio").unwrap();

    let catalog = EpisodeCatalog::new(root);
    catalog.migrate_legacy("alice").unwrap();
    let adopted_again = catalog.migrate_legacy("alice").unwrap();
    assert_eq!(adopted_again, 0);
    assert_eq!(catalog.list("alice").unwrap().len(), 1);
}
