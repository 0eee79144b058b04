use super::*;
use crate::clock::FakeClock;
use chrono::{TimeZone, Utc};

#[test]
fn queue_id_is_sortable_by_creation_order() {
    let clock = FakeClock::new();
    clock.set_utc(Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap());
    let first = new_queue_id(&clock);
    clock.set_utc(Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 6).unwrap());
    let second = new_queue_id(&clock);
    assert!(first < second);
}

#[test]
fn queue_id_has_expected_shape() {
    let clock = FakeClock::new();
    clock.set_utc(Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap());
    let id = new_queue_id(&clock);
    let (ts, suffix) = id.rsplit_once('_').unwrap();
    assert_eq!(ts, "20260102_030405");
    assert_eq!(suffix.len(), 8);
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn job_id_is_eight_hex_chars() {
    let id = new_job_id();
    assert_eq!(id.len(), 8);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn episode_id_matches_timestamp_format() {
    let clock = FakeClock::new();
    clock.set_utc(Utc.with_ymd_and_hms(2026, 7, 27, 9, 0, 0).unwrap());
    assert_eq!(new_episode_id(&clock), "20260727_090000");
}

#[test]
fn user_id_defaults_to_default_string() {
    assert_eq!(UserId::default().as_str(), "default");
}
