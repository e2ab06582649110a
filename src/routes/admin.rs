//! Admin routes — emailed-code login, session cookie, record management.

use axum::extract::{FromRef, Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;

use crate::routes::content::record_error_to_status;
use crate::services::admin_auth::{self, AdminAuthError};
use crate::services::records::{self, NewRecord, Record, RecordId, Table};
use crate::services::session::{self, AdminSession};
use crate::state::AppState;

const COOKIE_NAME: &str = "admin_session";
const SESSION_HOURS: i64 = 12;

fn session_cookie(token: String, secure: bool, max_age: Duration) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build()
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Admin extracted from the session cookie. Use as a handler parameter to
/// require an admin.
pub struct AdminUser {
    pub session: AdminSession,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let app_state = AppState::from_ref(state);
        let session = session::validate_session(&app_state.pool, token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "admin session lookup failed");
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        // Removing an address from the allowlist revokes its live sessions.
        if !app_state.config.admin.is_admin(&session.email) {
            return Err(StatusCode::UNAUTHORIZED);
        }

        Ok(Self { session, token: token.to_owned() })
    }
}

// =============================================================================
// LOGIN
// =============================================================================

#[derive(Deserialize)]
pub struct RequestCodeBody {
    pub email: String,
}

#[derive(Deserialize)]
pub struct VerifyCodeBody {
    pub email: String,
    pub code: String,
}

/// `POST /api/admin/login/request-code` — email a code to an allowlisted
/// admin. The answer does not reveal whether the address is an admin.
pub async fn request_code(
    State(state): State<AppState>,
    Json(body): Json<RequestCodeBody>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let email = admin_auth::normalize_email(&body.email).ok_or(StatusCode::BAD_REQUEST)?;
    state
        .form_limiter
        .check_and_record(&format!("admin:{email}"))
        .map_err(|e| {
            tracing::warn!(error = %e, "admin code request rate limited");
            StatusCode::TOO_MANY_REQUESTS
        })?;

    admin_auth::request_access_code(&state.pool, &state.config.admin, &email)
        .await
        .map_err(admin_auth_error_to_status)?;

    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `POST /api/admin/login/verify-code` — consume a code and set the admin cookie.
pub async fn verify_code(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<VerifyCodeBody>,
) -> Result<(CookieJar, Json<serde_json::Value>), StatusCode> {
    let email = admin_auth::verify_access_code(&state.pool, &state.config.admin, &body.email, &body.code)
        .await
        .map_err(admin_auth_error_to_status)?;

    let token = session::create_session(&state.pool, &email).await.map_err(|e| {
        tracing::error!(error = %e, "admin session creation failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    tracing::info!(%email, "admin signed in");

    let cookie = session_cookie(token, state.config.cookie_secure, Duration::hours(SESSION_HOURS));
    Ok((jar.add(cookie), Json(serde_json::json!({ "email": email }))))
}

/// `GET /api/admin/me` — current admin.
pub async fn me(admin: AdminUser) -> Json<AdminSession> {
    Json(admin.session)
}

/// `POST /api/admin/logout` — delete the session and clear the cookie.
pub async fn logout(State(state): State<AppState>, admin: AdminUser) -> (CookieJar, StatusCode) {
    if let Err(e) = session::delete_session(&state.pool, &admin.token).await {
        tracing::warn!(error = %e, "admin session delete failed");
    }
    let cookie = session_cookie(String::new(), state.config.cookie_secure, Duration::ZERO);
    (CookieJar::new().add(cookie), StatusCode::NO_CONTENT)
}

pub(crate) fn admin_auth_error_to_status(err: AdminAuthError) -> StatusCode {
    match err {
        AdminAuthError::InvalidEmail | AdminAuthError::InvalidCode => StatusCode::BAD_REQUEST,
        AdminAuthError::VerificationFailed => StatusCode::UNAUTHORIZED,
        AdminAuthError::EmailNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        AdminAuthError::Db(e) => {
            tracing::error!(error = %e, "admin auth store failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        AdminAuthError::EmailDelivery(e) => {
            tracing::error!(error = %e, "admin code email failed");
            StatusCode::BAD_GATEWAY
        }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// `GET /api/admin/records/{table}` — list any table, submissions included.
pub async fn list_records(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Record>>, StatusCode> {
    let table = Table::from_slug(&slug).map_err(record_error_to_status)?;
    let rows = records::list(&state.pool, table)
        .await
        .map_err(record_error_to_status)?;
    Ok(Json(rows))
}

/// `POST /api/admin/records/{table}` — create a content row.
pub async fn create_record(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(slug): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<Record>), StatusCode> {
    let table = Table::from_slug(&slug).map_err(record_error_to_status)?;
    if table.is_submission() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let new = NewRecord::from_json(table, body).map_err(record_error_to_status)?;
    let record = records::insert(&state.pool, &new)
        .await
        .map_err(record_error_to_status)?;

    tracing::info!(admin = %admin.session.email, table = record.table().slug(), id = ?record.id(), "record created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// `DELETE /api/admin/records/{table}/{id}` — delete one row.
pub async fn delete_record(
    State(state): State<AppState>,
    admin: AdminUser,
    Path((slug, raw_id)): Path<(String, String)>,
) -> Result<StatusCode, StatusCode> {
    let table = Table::from_slug(&slug).map_err(record_error_to_status)?;
    let id = RecordId::parse(table, &raw_id).map_err(record_error_to_status)?;
    records::delete(&state.pool, table, id)
        .await
        .map_err(record_error_to_status)?;

    tracing::info!(admin = %admin.session.email, table = table.slug(), id = %raw_id, "record deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;
