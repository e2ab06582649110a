use super::*;
use crate::rate_limit::RateLimitError;
use crate::services::forms::FieldError;
use crate::services::records::{NewContactSubmission, NewFeedbackSubmission, RecordError};
use crate::state::test_helpers;

#[test]
fn form_error_to_status_maps_each_variant() {
    assert_eq!(form_error_to_status(&FormError::Invalid(Vec::new())), StatusCode::UNPROCESSABLE_ENTITY);
    let limited = FormError::RateLimited(RateLimitError::GlobalExceeded { limit: 1, window_secs: 60 });
    assert_eq!(form_error_to_status(&limited), StatusCode::TOO_MANY_REQUESTS);
    let store = FormError::Store(RecordError::Database(sqlx::Error::PoolTimedOut));
    assert_eq!(form_error_to_status(&store), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn invalid_form_body_lists_errors() {
    let response = form_error_response(FormError::Invalid(vec![FieldError {
        field: "email",
        message: "must be a valid email address".into(),
    }]));
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["errors"][0]["field"], "email");
}

#[tokio::test]
async fn submit_handler_rejects_invalid_contact() {
    let (state, _log) = test_helpers::test_app_state();
    let body = NewContactSubmission { name: "Ann".into(), email: "bad".into(), phone: "9876543210".into(), reason: "Need a prospectus".into() };
    let response = submit(State(state), Ok(Json(body))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

async fn decode<F: DeserializeOwned>(raw: &'static str) -> Result<Json<F>, JsonRejection> {
    use axum::extract::FromRequest;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/forms/contact")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(raw))
        .unwrap();
    Json::<F>::from_request(request, &()).await
}

async fn error_fields(response: Response) -> Vec<String> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap().to_owned())
        .collect()
}

#[tokio::test]
async fn partial_contact_body_lists_every_missing_field() {
    let (state, _log) = test_helpers::test_app_state();
    let payload = decode::<NewContactSubmission>(r#"{"name":"A"}"#).await;
    assert!(payload.is_ok());

    let response = submit(State(state), payload).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(response).await, vec!["name", "email", "phone", "reason"]);
}

#[tokio::test]
async fn undecodable_body_is_reported_as_json() {
    let (state, _log) = test_helpers::test_app_state();
    let payload = decode::<NewFeedbackSubmission>(r#"{"rating":"five"}"#).await;
    assert!(payload.is_err());

    let response = submit(State(state), payload).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(response).await, vec!["body"]);
}

#[tokio::test]
async fn malformed_json_is_reported_as_json() {
    let (state, _log) = test_helpers::test_app_state();
    let payload = decode::<NewContactSubmission>("{not json").await;

    let response = submit(State(state), payload).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(response).await, vec!["body"]);
}
