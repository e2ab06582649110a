//! Admin access-code auth service.
//!
//! Issues and verifies short-lived six-character codes for allowlisted admin
//! emails. Codes are stored hashed; a code burns after too many wrong guesses.

use rand::Rng;
use resend_rs::Resend;
use resend_rs::types::CreateEmailBaseOptions;
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::config::{AdminConfig, EmailConfig};

const CODE_LEN: usize = 6;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const MAX_FAILED_ATTEMPTS: i32 = 5;
const ADMIN_CODE_TEMPLATE: &str = include_str!("../../templates/admin_code.html");

#[derive(Debug, thiserror::Error)]
pub enum AdminAuthError {
    #[error("invalid email")]
    InvalidEmail,
    #[error("invalid code")]
    InvalidCode,
    #[error("expired or incorrect code")]
    VerificationFailed,
    #[error("admin email delivery is not configured")]
    EmailNotConfigured,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("email delivery failed: {0}")]
    EmailDelivery(String),
}

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some(normalized)
}

#[must_use]
pub fn normalize_code(code: &str) -> Option<String> {
    let normalized = code.trim().to_ascii_uppercase();
    if normalized.len() != CODE_LEN || !normalized.bytes().all(|b| CODE_ALPHABET.contains(&b)) {
        return None;
    }
    Some(normalized)
}

#[must_use]
pub fn generate_access_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

#[must_use]
pub fn hash_access_code(code: &str) -> String {
    let digest = Sha256::digest(code.as_bytes());
    crate::services::session::bytes_to_hex(&digest)
}

/// Issue a fresh code for an allowlisted admin and email it.
///
/// Returns `Ok(false)` without touching the database when the email is not
/// on the allowlist, so callers can answer both cases identically.
///
/// # Errors
///
/// Malformed email, missing email delivery config, or store/delivery failure.
pub async fn request_access_code(pool: &PgPool, admin: &AdminConfig, email: &str) -> Result<bool, AdminAuthError> {
    let normalized = normalize_email(email).ok_or(AdminAuthError::InvalidEmail)?;
    let delivery = admin.email.as_ref().ok_or(AdminAuthError::EmailNotConfigured)?;
    if !admin.is_admin(&normalized) {
        tracing::info!(email = %normalized, "admin code requested for non-admin email");
        return Ok(false);
    }

    let code = store_access_code(pool, &normalized).await?;
    send_access_code_email(delivery, &normalized, &code).await?;
    Ok(true)
}

/// Replace any outstanding code for `email` with a new one.
async fn store_access_code(pool: &PgPool, email: &str) -> Result<String, AdminAuthError> {
    sqlx::query("DELETE FROM admin_login_codes WHERE email = $1 AND consumed_at IS NULL")
        .bind(email)
        .execute(pool)
        .await?;

    let code = generate_access_code();
    sqlx::query("INSERT INTO admin_login_codes (email, code_hash) VALUES ($1, $2)")
        .bind(email)
        .bind(hash_access_code(&code))
        .execute(pool)
        .await?;

    Ok(code)
}

/// Consume the newest live code for `email`, returning the normalized email.
///
/// # Errors
///
/// `VerificationFailed` for a wrong, expired, or burned code, or an email
/// that is no longer on the allowlist.
pub async fn verify_access_code(
    pool: &PgPool,
    admin: &AdminConfig,
    email: &str,
    code: &str,
) -> Result<String, AdminAuthError> {
    let normalized_email = normalize_email(email).ok_or(AdminAuthError::InvalidEmail)?;
    let normalized_code = normalize_code(code).ok_or(AdminAuthError::InvalidCode)?;
    if !admin.is_admin(&normalized_email) {
        return Err(AdminAuthError::VerificationFailed);
    }

    let consumed = sqlx::query(
        r"UPDATE admin_login_codes
          SET consumed_at = now()
          WHERE id = (
              SELECT id
              FROM admin_login_codes
              WHERE email = $1
                AND consumed_at IS NULL
                AND expires_at > now()
              ORDER BY created_at DESC
              LIMIT 1
          )
          AND code_hash = $2
          RETURNING id",
    )
    .bind(&normalized_email)
    .bind(hash_access_code(&normalized_code))
    .fetch_optional(pool)
    .await?;

    if consumed.is_none() {
        sqlx::query(
            r"UPDATE admin_login_codes
              SET attempts = attempts + 1,
                  consumed_at = CASE WHEN attempts + 1 >= $2 THEN now() ELSE consumed_at END
              WHERE id = (
                  SELECT id
                  FROM admin_login_codes
                  WHERE email = $1
                    AND consumed_at IS NULL
                    AND expires_at > now()
                  ORDER BY created_at DESC
                  LIMIT 1
              )",
        )
        .bind(&normalized_email)
        .bind(MAX_FAILED_ATTEMPTS)
        .execute(pool)
        .await?;
        return Err(AdminAuthError::VerificationFailed);
    }

    Ok(normalized_email)
}

async fn send_access_code_email(delivery: &EmailConfig, to_email: &str, code: &str) -> Result<(), AdminAuthError> {
    let resend = Resend::new(&delivery.resend_api_key);
    let html = render_admin_code_template(to_email, code);
    let message = CreateEmailBaseOptions::new(&delivery.from, [to_email], "Your admin sign-in code").with_html(&html);
    resend
        .emails
        .send(message)
        .await
        .map_err(|e| AdminAuthError::EmailDelivery(e.to_string()))?;
    Ok(())
}

#[must_use]
pub fn render_admin_code_template(email: &str, code: &str) -> String {
    ADMIN_CODE_TEMPLATE
        .replace("{{EMAIL}}", email)
        .replace("{{CODE}}", code)
}

#[cfg(test)]
#[path = "admin_auth_test.rs"]
mod tests;
