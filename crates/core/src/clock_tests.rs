use super::*;
use std::time::Duration;

#[test]
fn fake_clock_advances_both_instant_and_utc() {
    let clock = FakeClock::new();
    let before_instant = clock.now();
    let before_utc = clock.now_utc();
    clock.advance(Duration::from_secs(5));
    assert!(clock.now() >= before_instant + Duration::from_secs(5));
    assert_eq!(clock.now_utc(), before_utc + chrono::Duration::seconds(5));
}

#[test]
fn system_clock_epoch_ms_is_positive() {
    assert!(SystemClock.epoch_ms() > 0);
}
