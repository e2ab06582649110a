//! Admin session management.
//!
//! A successful code verification yields an opaque random token stored in
//! `admin_sessions` and handed to the browser as an HttpOnly cookie. Sessions
//! expire server-side; the cookie carries no claims.

use std::fmt::Write;

use rand::Rng;
use sqlx::{PgPool, Row};

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Admin identity behind a live session.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AdminSession {
    pub email: String,
    /// RFC 3339 UTC expiry.
    pub expires_at: String,
}

/// Create a session for an admin email, returning the token.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn create_session(pool: &PgPool, email: &str) -> Result<String, sqlx::Error> {
    let token = generate_token();
    sqlx::query("INSERT INTO admin_sessions (token, email) VALUES ($1, $2)")
        .bind(&token)
        .bind(email)
        .execute(pool)
        .await?;
    Ok(token)
}

/// Look up an unexpired session by token.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<AdminSession>, sqlx::Error> {
    let row = sqlx::query(
        r#"SELECT email,
                  to_char(expires_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS expires_at
           FROM admin_sessions
           WHERE token = $1 AND expires_at > now()"#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| AdminSession { email: r.get("email"), expires_at: r.get("expires_at") }))
}

/// Delete a session by token.
///
/// # Errors
///
/// Returns a database error if the delete fails.
pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM admin_sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Drop expired sessions and spent login codes. Returns rows removed.
///
/// # Errors
///
/// Returns a database error if either delete fails.
pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let sessions = sqlx::query("DELETE FROM admin_sessions WHERE expires_at <= now()")
        .execute(pool)
        .await?
        .rows_affected();
    let codes = sqlx::query("DELETE FROM admin_login_codes WHERE expires_at <= now() OR consumed_at IS NOT NULL")
        .execute(pool)
        .await?
        .rows_affected();
    Ok(sessions + codes)
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
