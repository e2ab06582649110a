//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API under `/api` and serves the static site
//! for every other path. Chat and admin state travel in HttpOnly cookies.

pub mod admin;
pub mod chat;
pub mod content;
pub mod forms;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::services::records::{
    NewAdmissionApplication, NewCampusVisitRequest, NewContactSubmission, NewFeedbackSubmission,
    NewScholarshipApplication,
};
use crate::state::AppState;

/// API routes only.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/chat/session", get(chat::get_session).delete(chat::end_session))
        .route("/api/chat/messages", post(chat::send_message))
        .route("/api/chat/route", post(chat::preview_route))
        .route("/api/pages", get(chat::pages))
        .route("/api/forms/admission", post(forms::submit::<NewAdmissionApplication>))
        .route("/api/forms/campus-visit", post(forms::submit::<NewCampusVisitRequest>))
        .route("/api/forms/contact", post(forms::submit::<NewContactSubmission>))
        .route("/api/forms/feedback", post(forms::submit::<NewFeedbackSubmission>))
        .route("/api/forms/scholarship", post(forms::submit::<NewScholarshipApplication>))
        .route("/api/content/{table}", get(content::list_content))
        .route("/api/admin/login/request-code", post(admin::request_code))
        .route("/api/admin/login/verify-code", post(admin::verify_code))
        .route("/api/admin/me", get(admin::me))
        .route("/api/admin/logout", post(admin::logout))
        .route(
            "/api/admin/records/{table}",
            get(admin::list_records).post(admin::create_record),
        )
        .route("/api/admin/records/{table}/{id}", delete(admin::delete_record))
        .route("/healthz", get(healthz))
}

/// Full application: API routes plus the static site as fallback.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let site = ServeDir::new(&state.config.site_dir).append_index_html_on_directories(true);

    api_routes()
        .fallback_service(site)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_helpers;

    #[tokio::test]
    async fn healthz_is_ok() {
        assert_eq!(healthz().await, StatusCode::OK);
    }

    #[tokio::test]
    async fn app_builds_with_test_state() {
        let (state, _log) = test_helpers::test_app_state();
        let _router = app(state);
    }
}
