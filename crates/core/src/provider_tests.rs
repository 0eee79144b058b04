use super::*;
use yare::parameterized;

#[parameterized(
    in_range_low = { -50, true },
    in_range_high = { 100, true },
    too_low = { -51, false },
    too_high = { 101, false },
)]
fn speed_rate_bounds(case: (i32, bool)) {
    let (rate, expect_ok) = case;
    let mut opts = TtsOptions::default();
    opts.speed_rate = Some(rate);
    assert_eq!(opts.validate().is_ok(), expect_ok);
}

#[test]
fn unknown_keys_are_simply_absent_not_rejected() {
    // Deserializing a JSON blob with an unrecognized key is still fine:
    // serde ignores fields we don't declare.
    let json = serde_json::json!({ "voice": "alloy", "bogus_field": 123 });
    let opts: TtsOptions = serde_json::from_value(json).unwrap();
    assert_eq!(opts.voice.as_deref(), Some("alloy"));
}

#[test]
fn invalid_encoding_rejected() {
    let mut opts = TtsOptions::default();
    opts.encoding = Some("flac".to_string());
    assert_eq!(opts.validate(), Err(TtsOptionsError::InvalidEncoding("flac".to_string())));
}

#[test]
fn invalid_action_rejected() {
    let mut opts = TtsOptions::default();
    opts.action = Some(2);
    assert_eq!(opts.validate(), Err(TtsOptionsError::InvalidAction(2)));
}

#[test]
fn extension_defaults_to_mp3() {
    let opts = TtsOptions::default();
    assert_eq!(opts.extension(), "mp3");
}

#[test]
fn extension_respects_wav_encoding() {
    let mut opts = TtsOptions::default();
    opts.encoding = Some("wav".to_string());
    assert_eq!(opts.extension(), "wav");
}
