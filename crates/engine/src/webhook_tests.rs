use super::*;
use serde_json::json;

#[test]
fn event_serializes_to_snake_case() {
    assert_eq!(serde_json::to_string(&WebhookEvent::JobSuccess).unwrap(), "\"job_success\"");
    assert_eq!(serde_json::to_string(&WebhookEvent::JobFailed).unwrap(), "\"job_failed\"");
}

#[test]
fn payload_shape_matches_wire_contract() {
    let data = json!({"job_id": "abc123"});
    let now = chrono::Utc::now();
    let payload = WebhookPayload { event: WebhookEvent::JobSuccess, timestamp: now, data: &data };
    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(value["event"], "job_success");
    assert_eq!(value["data"]["job_id"], "abc123");
    assert!(value.get("timestamp").is_some());
}
