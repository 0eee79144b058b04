use super::*;
use axum::response::IntoResponse;

#[test]
fn missing_input_maps_to_400() {
    let resp = ServerError::MissingInput.into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn unknown_job_maps_to_404() {
    let resp = ServerError::UnknownJob("abc123".to_string()).into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[test]
fn not_cancellable_maps_to_400() {
    let err = ServerError::NotCancellable(CancelError::NotCancellable(echocast_core::JobState::Completed));
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
