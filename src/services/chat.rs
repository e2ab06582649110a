//! Chat service — session identity, transcripts, and the reply flow.
//!
//! DESIGN
//! ======
//! A visitor's session identifier lives in client-side storage under a fixed
//! key and is reused until that storage is cleared. The transcript for a
//! session is held in `AppState::chats`; on first access it is hydrated from
//! the message log, or seeded with the welcome message when there is no
//! history. A session with no history is only kept in memory once it sends a
//! message. Idle transcripts are evicted by a periodic sweep and rehydrate
//! from the log on next access.
//!
//! Reply flow: append user message → pause → route → append assistant
//! message. Both messages are handed to the message writer as a best-effort
//! side channel; the reply never waits on, or reports, persistence.

use std::time::{Duration, Instant};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::services::intent::Destination;
use crate::services::message_log::{self, Message, Origin};
use crate::state::AppState;

/// Storage key the session identifier is kept under.
pub const SESSION_STORAGE_KEY: &str = "chat_session_id";

pub const WELCOME_MESSAGE: &str = "Hi there! 👋 I'm the college assistant. How can I help you today?";

/// Longest accepted user message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("message exceeds {MAX_MESSAGE_CHARS} characters")]
    MessageTooLong,
    #[error(transparent)]
    RateLimited(#[from] crate::rate_limit::RateLimitError),
}

// =============================================================================
// SESSION IDENTIFIER
// =============================================================================

/// Client-side key/value storage holding the session identifier.
pub trait SessionStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

#[must_use]
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Return the stored session identifier, creating and storing one if absent.
///
/// A stored value that is not a UUID is replaced.
pub fn session_id(storage: &mut impl SessionStorage) -> String {
    if let Some(existing) = storage.get(SESSION_STORAGE_KEY) {
        if Uuid::parse_str(&existing).is_ok() {
            return existing;
        }
    }
    let id = generate_session_id();
    storage.set(SESSION_STORAGE_KEY, id.clone());
    id
}

// =============================================================================
// TRANSCRIPT
// =============================================================================

/// One live transcript and when it was last read or written.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub messages: Vec<Message>,
    pub last_active: Instant,
}

impl Transcript {
    fn new(messages: Vec<Message>) -> Self {
        Self { messages, last_active: Instant::now() }
    }

    fn touch(&mut self) {
        self.last_active = Instant::now();
    }
}

fn welcome() -> Message {
    Message::new(WELCOME_MESSAGE, Origin::Assistant)
}

async fn fetch_history(state: &AppState, session_id: &str) -> Vec<Message> {
    match state.message_log.fetch(session_id).await {
        Ok(history) => history,
        Err(e) => {
            warn!(error = %e, session_id, "chat history fetch failed; starting fresh");
            Vec::new()
        }
    }
}

/// Return the session transcript, hydrating it on first access.
///
/// A session with no history gets the welcome message but is not kept in
/// memory until it sends something.
pub async fn load_transcript(state: &AppState, session_id: &str) -> Vec<Message> {
    {
        let mut chats = state.chats.write().await;
        if let Some(transcript) = chats.get_mut(session_id) {
            transcript.touch();
            return transcript.messages.clone();
        }
    }

    // PHASE: HYDRATE
    // Fetch outside the lock; a racing hydrate for the same session keeps
    // whichever transcript landed first.
    let history = fetch_history(state, session_id).await;
    if history.is_empty() {
        return vec![welcome()];
    }

    let mut chats = state.chats.write().await;
    chats
        .entry(session_id.to_owned())
        .or_insert_with(|| Transcript::new(history))
        .messages
        .clone()
}

/// Bring the transcript into memory before it is appended to, seeding the
/// welcome message for a session with no history.
async fn ensure_hydrated(state: &AppState, session_id: &str) {
    if state.chats.read().await.contains_key(session_id) {
        return;
    }
    let mut history = fetch_history(state, session_id).await;
    if history.is_empty() {
        history.push(welcome());
    }
    state
        .chats
        .write()
        .await
        .entry(session_id.to_owned())
        .or_insert_with(|| Transcript::new(history));
}

/// Forget the in-memory transcript for a session. Persisted rows are kept.
pub async fn end_session(state: &AppState, session_id: &str) -> bool {
    state.chats.write().await.remove(session_id).is_some()
}

/// Drop transcripts idle for at least `max_idle`, returning how many went.
pub async fn evict_idle(state: &AppState, max_idle: Duration) -> usize {
    let mut chats = state.chats.write().await;
    let before = chats.len();
    chats.retain(|_, transcript| transcript.last_active.elapsed() < max_idle);
    before - chats.len()
}

async fn append(state: &AppState, session_id: &str, message: &Message) {
    {
        let mut chats = state.chats.write().await;
        let transcript = chats
            .entry(session_id.to_owned())
            .or_insert_with(|| Transcript::new(Vec::new()));
        transcript.messages.push(message.clone());
        transcript.touch();
    }
    message_log::enqueue(state.message_tx.as_ref(), session_id, message);
}

// =============================================================================
// REPLY FLOW
// =============================================================================

/// The assistant's answer to one user message.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChatReply {
    pub message: Message,
    pub destination: Option<Destination>,
    pub path: Option<String>,
    /// How long the client should wait before navigating; set only with a destination.
    pub navigate_after_ms: Option<u64>,
}

/// Validate a raw user message, returning the text to store.
///
/// # Errors
///
/// Blank or oversized input.
pub fn validate_message(raw: &str) -> Result<&str, ChatError> {
    if raw.trim().is_empty() {
        return Err(ChatError::EmptyMessage);
    }
    if raw.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ChatError::MessageTooLong);
    }
    Ok(raw)
}

/// Run the full reply flow for one user message.
///
/// # Errors
///
/// Invalid input or an exceeded rate limit. Persistence problems never
/// surface here.
pub async fn send_message(state: &AppState, session_id: &str, raw: &str) -> Result<ChatReply, ChatError> {
    let text = validate_message(raw)?;
    state.chat_limiter.check_and_record(session_id)?;

    ensure_hydrated(state, session_id).await;

    let user_message = Message::new(text, Origin::User);
    append(state, session_id, &user_message).await;

    let delay = state.config.chat.reply_delay;
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let resolution = state.router.resolve(text);
    debug!(session_id, destination = ?resolution.destination, "chat message routed");

    let reply = Message::new(resolution.response, Origin::Assistant);
    append(state, session_id, &reply).await;

    let navigate_after_ms = resolution
        .destination
        .map(|_| u64::try_from(state.config.chat.navigate_delay.as_millis()).unwrap_or(u64::MAX));

    Ok(ChatReply {
        message: reply,
        destination: resolution.destination,
        path: resolution.destination.map(Destination::path),
        navigate_after_ms,
    })
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
