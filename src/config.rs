//! Runtime configuration parsed from environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! `main` loads `.env` (if present) through `dotenvy`, then builds one
//! `AppConfig` that is shared read-only through `AppState`. Optional
//! integrations (Resend email delivery) are `None` when unconfigured and the
//! dependent endpoints answer 503 instead of failing startup.

use std::path::PathBuf;
use std::time::Duration;

use crate::rate_limit::RateLimitConfig;
use crate::services::intent::MatchMode;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SITE_DIR: &str = "site";
const DEFAULT_CHAT_REPLY_DELAY_MS: u64 = 1000;
const DEFAULT_CHAT_NAVIGATE_DELAY_MS: u64 = 1500;
const DEFAULT_CHAT_PERSIST_QUEUE_CAPACITY: usize = 1024;
const DEFAULT_CHAT_IDLE_TTL_SECS: u64 = 30 * 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

// =============================================================================
// SECTIONS
// =============================================================================

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub match_mode: MatchMode,
    /// Pause before the assistant reply is produced.
    pub reply_delay: Duration,
    /// Pause the client should wait before following a destination.
    pub navigate_delay: Duration,
    pub persist_queue_capacity: usize,
    pub rate_limit: RateLimitConfig,
    /// In-memory transcripts idle this long are evicted.
    pub idle_ttl: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::default(),
            reply_delay: Duration::from_millis(DEFAULT_CHAT_REPLY_DELAY_MS),
            navigate_delay: Duration::from_millis(DEFAULT_CHAT_NAVIGATE_DELAY_MS),
            persist_queue_capacity: DEFAULT_CHAT_PERSIST_QUEUE_CAPACITY,
            rate_limit: RateLimitConfig::chat_defaults(),
            idle_ttl: Duration::from_secs(DEFAULT_CHAT_IDLE_TTL_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub resend_api_key: String,
    pub from: String,
}

#[derive(Debug, Clone, Default)]
pub struct AdminConfig {
    /// Normalized (trimmed, lower-cased) admin addresses.
    pub emails: Vec<String>,
    pub email: Option<EmailConfig>,
}

impl AdminConfig {
    #[must_use]
    pub fn is_admin(&self, email: &str) -> bool {
        self.emails.iter().any(|e| e == email)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub site_dir: PathBuf,
    pub cookie_secure: bool,
    pub chat: ChatConfig,
    pub forms_rate_limit: RateLimitConfig,
    pub admin: AdminConfig,
}

impl AppConfig {
    /// Build the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a provided value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let port = env_parse_strict("PORT", DEFAULT_PORT)?;
        let site_dir = std::env::var("SITE_DIR").map_or_else(|_| PathBuf::from(DEFAULT_SITE_DIR), PathBuf::from);
        let cookie_secure = env_bool("COOKIE_SECURE").unwrap_or(false);

        let match_mode = match std::env::var("CHAT_MATCH_MODE") {
            Ok(raw) => MatchMode::from_str(&raw).ok_or(ConfigError::Invalid { key: "CHAT_MATCH_MODE", value: raw })?,
            Err(_) => MatchMode::default(),
        };
        let chat = ChatConfig {
            match_mode,
            reply_delay: Duration::from_millis(env_parse("CHAT_REPLY_DELAY_MS", DEFAULT_CHAT_REPLY_DELAY_MS)),
            navigate_delay: Duration::from_millis(env_parse("CHAT_NAVIGATE_DELAY_MS", DEFAULT_CHAT_NAVIGATE_DELAY_MS)),
            persist_queue_capacity: env_parse("CHAT_PERSIST_QUEUE_CAPACITY", DEFAULT_CHAT_PERSIST_QUEUE_CAPACITY)
                .max(1),
            rate_limit: RateLimitConfig::from_env("CHAT", RateLimitConfig::chat_defaults()),
            idle_ttl: Duration::from_secs(env_parse("CHAT_IDLE_TTL_SECS", DEFAULT_CHAT_IDLE_TTL_SECS).max(1)),
        };

        let admin = AdminConfig {
            emails: parse_email_list(&std::env::var("ADMIN_EMAILS").unwrap_or_default()),
            email: email_config_from_env(),
        };

        Ok(Self {
            database_url,
            port,
            site_dir,
            cookie_secure,
            chat,
            forms_rate_limit: RateLimitConfig::from_env("FORM", RateLimitConfig::form_defaults()),
            admin,
        })
    }
}

fn email_config_from_env() -> Option<EmailConfig> {
    let resend_api_key = std::env::var("RESEND_API_KEY").ok().filter(|v| !v.trim().is_empty())?;
    let from = std::env::var("RESEND_FROM").ok().filter(|v| !v.trim().is_empty())?;
    Some(EmailConfig { resend_api_key, from })
}

// =============================================================================
// HELPERS
// =============================================================================

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_parse_strict<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated address list, normalizing and dropping invalid entries.
pub(crate) fn parse_email_list(raw: &str) -> Vec<String> {
    let mut emails = raw
        .split(',')
        .filter_map(crate::services::admin_auth::normalize_email)
        .collect::<Vec<_>>();
    emails.sort();
    emails.dedup();
    emails
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
