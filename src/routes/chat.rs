//! Chat routes — session cookie, transcript, reply flow, router preview.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::services::chat::{self, ChatError, ChatReply, SESSION_STORAGE_KEY, SessionStorage};
use crate::services::intent::Destination;
use crate::services::message_log::Message;
use crate::state::AppState;

// =============================================================================
// COOKIE STORAGE
// =============================================================================

/// `SessionStorage` over the request's cookie jar. Changes are written back
/// to the client by returning `jar` from the handler.
pub struct CookieStorage {
    pub jar: CookieJar,
    secure: bool,
}

impl CookieStorage {
    #[must_use]
    pub fn new(jar: CookieJar, secure: bool) -> Self {
        Self { jar, secure }
    }
}

impl SessionStorage for CookieStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.jar.get(key).map(|c| c.value().to_owned())
    }

    fn set(&mut self, key: &str, value: String) {
        let cookie = Cookie::build((key.to_owned(), value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(Duration::days(365));
        self.jar = std::mem::take(&mut self.jar).add(cookie);
    }

    fn remove(&mut self, key: &str) {
        let cookie = Cookie::build((key.to_owned(), "")).path("/");
        self.jar = std::mem::take(&mut self.jar).remove(cookie);
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub messages: Vec<Message>,
}

#[derive(Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// `GET /api/chat/session` — ensure a session cookie and return its transcript.
pub async fn get_session(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<SessionResponse>) {
    let mut storage = CookieStorage::new(jar, state.config.cookie_secure);
    let session_id = chat::session_id(&mut storage);
    let messages = chat::load_transcript(&state, &session_id).await;
    (storage.jar, Json(SessionResponse { session_id, messages }))
}

/// `POST /api/chat/messages` — run the reply flow for one message.
pub async fn send_message(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<MessageBody>,
) -> Result<(CookieJar, Json<ChatReply>), StatusCode> {
    let mut storage = CookieStorage::new(jar, state.config.cookie_secure);
    let session_id = chat::session_id(&mut storage);
    let reply = chat::send_message(&state, &session_id, &body.message)
        .await
        .map_err(chat_error_to_status)?;
    Ok((storage.jar, Json(reply)))
}

/// `DELETE /api/chat/session` — forget the transcript and clear the cookie.
pub async fn end_session(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut storage = CookieStorage::new(jar, state.config.cookie_secure);
    if let Some(session_id) = storage.get(SESSION_STORAGE_KEY) {
        chat::end_session(&state, &session_id).await;
    }
    storage.remove(SESSION_STORAGE_KEY);
    (storage.jar, StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct RoutePreview {
    pub response: &'static str,
    pub destination: Option<Destination>,
    pub path: Option<String>,
}

/// `POST /api/chat/route` — resolve a message without touching any session.
pub async fn preview_route(
    State(state): State<AppState>,
    Json(body): Json<MessageBody>,
) -> Result<Json<RoutePreview>, StatusCode> {
    let text = chat::validate_message(&body.message).map_err(chat_error_to_status)?;
    let resolution = state.router.resolve(text);
    Ok(Json(RoutePreview {
        response: resolution.response,
        destination: resolution.destination,
        path: resolution.destination.map(Destination::path),
    }))
}

#[derive(Serialize)]
pub struct PageEntry {
    pub destination: Destination,
    pub path: String,
    pub title: &'static str,
}

/// `GET /api/pages` — every page the assistant can navigate to.
pub async fn pages() -> Json<Vec<PageEntry>> {
    Json(
        Destination::ALL
            .into_iter()
            .map(|d| PageEntry { destination: d, path: d.path(), title: d.title() })
            .collect(),
    )
}

pub(crate) fn chat_error_to_status(err: ChatError) -> StatusCode {
    match err {
        ChatError::EmptyMessage | ChatError::MessageTooLong => StatusCode::UNPROCESSABLE_ENTITY,
        ChatError::RateLimited(e) => {
            tracing::warn!(error = %e, "chat rate limited");
            StatusCode::TOO_MANY_REQUESTS
        }
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
