//! Message log — append-only, session-scoped chat transcript storage.
//!
//! DESIGN
//! ======
//! `MessageLog` is the seam between the chat service and the store. The
//! Postgres implementation writes `chatbot_messages`; tests use the in-memory
//! implementation from `state::test_helpers`.
//!
//! Writes go through one background writer draining a bounded queue, so the
//! rows of a session land in the same order they were appended. Fetch orders
//! by that insertion sequence; `ts` is display data only. Enqueue never
//! blocks the request path.
//!
//! ERROR HANDLING
//! ==============
//! Persistence is a best-effort side channel. A full queue or a failed insert
//! is logged and the message is dropped; nothing is retried and the caller is
//! never told. The in-memory transcript stays authoritative.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, warn};
use uuid::Uuid;

// =============================================================================
// MESSAGE
// =============================================================================

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    User,
    Assistant,
}

impl Origin {
    #[must_use]
    pub fn is_bot(self) -> bool {
        matches!(self, Self::Assistant)
    }

    #[must_use]
    pub fn from_is_bot(is_bot: bool) -> Self {
        if is_bot { Self::Assistant } else { Self::User }
    }
}

/// One chat transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub origin: Origin,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl Message {
    #[must_use]
    pub fn new(content: impl Into<String>, origin: Origin) -> Self {
        Self { id: Uuid::new_v4(), content: content.into(), origin, timestamp: now_ms() }
    }
}

pub(crate) fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

// =============================================================================
// STORE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum MessageLogError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait::async_trait]
pub trait MessageLog: Send + Sync {
    /// Append one message to a session's log.
    async fn append(&self, session_id: &str, message: &Message) -> Result<(), MessageLogError>;

    /// All messages of a session, oldest first.
    async fn fetch(&self, session_id: &str) -> Result<Vec<Message>, MessageLogError>;
}

/// `chatbot_messages` table backed log.
pub struct PgMessageLog {
    pool: PgPool,
}

impl PgMessageLog {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MessageLog for PgMessageLog {
    async fn append(&self, session_id: &str, message: &Message) -> Result<(), MessageLogError> {
        sqlx::query(
            "INSERT INTO chatbot_messages (id, session_id, message, is_bot, ts)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(message.id)
        .bind(session_id)
        .bind(&message.content)
        .bind(message.origin.is_bot())
        .bind(message.timestamp)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch(&self, session_id: &str) -> Result<Vec<Message>, MessageLogError> {
        let rows = sqlx::query(
            "SELECT id, message, is_bot, ts
             FROM chatbot_messages
             WHERE session_id = $1
             ORDER BY seq ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Message {
                id: r.get("id"),
                content: r.get("message"),
                origin: Origin::from_is_bot(r.get("is_bot")),
                timestamp: r.get("ts"),
            })
            .collect())
    }
}

// =============================================================================
// ORDERED WRITER
// =============================================================================

/// A message waiting for the background writer.
#[derive(Debug, Clone)]
pub struct PendingMessage {
    pub session_id: String,
    pub message: Message,
}

/// Spawn the single writer task and return its queue plus a join handle.
///
/// The task exits once every sender has been dropped and the queue drained.
#[must_use]
pub fn spawn_message_writer(
    log: Arc<dyn MessageLog>,
    capacity: usize,
) -> (mpsc::Sender<PendingMessage>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<PendingMessage>(capacity.max(1));
    let handle = tokio::spawn(async move {
        while let Some(pending) = rx.recv().await {
            if let Err(e) = log.append(&pending.session_id, &pending.message).await {
                error!(
                    error = %e,
                    session_id = %pending.session_id,
                    message_id = %pending.message.id,
                    "chat message persist failed; dropping"
                );
            }
        }
    });
    (tx, handle)
}

/// Best-effort, non-blocking enqueue. A full or closed queue drops the message.
pub fn enqueue(tx: Option<&mpsc::Sender<PendingMessage>>, session_id: &str, message: &Message) {
    let Some(tx) = tx else {
        return;
    };

    let pending = PendingMessage { session_id: session_id.to_owned(), message: message.clone() };
    match tx.try_send(pending) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(_)) => {
            warn!(session_id, message_id = %message.id, "chat persist queue full; dropping message");
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            warn!(session_id, message_id = %message.id, "chat persist queue closed; dropping message");
        }
    }
}

#[cfg(test)]
#[path = "message_log_test.rs"]
mod tests;
