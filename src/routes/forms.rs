//! Public form routes.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::de::DeserializeOwned;

use crate::services::forms::{self, FieldError, FormError, FormSubmission};
use crate::state::AppState;

/// `POST /api/forms/{form}` — validate and store one submission.
///
/// Absent fields decode as empty and are reported by validation; a body that
/// is not JSON or has mistyped fields is reported under `body`.
pub async fn submit<F>(State(state): State<AppState>, payload: Result<Json<F>, JsonRejection>) -> Response
where
    F: FormSubmission + DeserializeOwned + Send + 'static,
{
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            let errors = vec![FieldError { field: "body", message: rejection.body_text() }];
            return form_error_response(FormError::Invalid(errors));
        }
    };
    match forms::submit(&state, body).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => form_error_response(e),
    }
}

pub(crate) fn form_error_to_status(err: &FormError) -> StatusCode {
    match err {
        FormError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        FormError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        FormError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn form_error_response(err: FormError) -> Response {
    let status = form_error_to_status(&err);
    match err {
        FormError::Invalid(errors) => (status, Json(serde_json::json!({ "errors": errors }))).into_response(),
        FormError::RateLimited(e) => {
            tracing::warn!(error = %e, "form submission rate limited");
            status.into_response()
        }
        FormError::Store(e) => {
            tracing::error!(error = %e, "form submission store failed");
            status.into_response()
        }
    }
}

#[cfg(test)]
#[path = "forms_test.rs"]
mod tests;
