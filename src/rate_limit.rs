//! In-memory rate limiting for chat messages and form submissions.
//!
//! DESIGN
//! ======
//! Sliding-window counters backed by `HashMap<String, VecDeque<Instant>>`.
//! Two limits are enforced per limiter instance:
//! - Per-key: chat session id, or normalized email for forms
//! - Global: all keys combined
//!
//! Keys whose window has fully drained are dropped on the next check so the
//! map does not grow with one-off visitors.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::config::env_parse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub per_key_limit: usize,
    pub per_key_window: Duration,
    pub global_limit: usize,
    pub global_window: Duration,
}

impl RateLimitConfig {
    #[must_use]
    pub fn chat_defaults() -> Self {
        Self {
            per_key_limit: 30,
            per_key_window: Duration::from_secs(60),
            global_limit: 600,
            global_window: Duration::from_secs(60),
        }
    }

    #[must_use]
    pub fn form_defaults() -> Self {
        Self {
            per_key_limit: 5,
            per_key_window: Duration::from_secs(600),
            global_limit: 200,
            global_window: Duration::from_secs(60),
        }
    }

    /// Override `defaults` from `{prefix}_RATE_LIMIT_*` variables.
    #[must_use]
    pub fn from_env(prefix: &str, defaults: Self) -> Self {
        let key = |suffix: &str| format!("{prefix}_RATE_LIMIT_{suffix}");
        Self {
            per_key_limit: env_parse(&key("PER_KEY"), defaults.per_key_limit),
            per_key_window: Duration::from_secs(env_parse(
                &key("PER_KEY_WINDOW_SECS"),
                defaults.per_key_window.as_secs(),
            )),
            global_limit: env_parse(&key("GLOBAL"), defaults.global_limit),
            global_window: Duration::from_secs(env_parse(
                &key("GLOBAL_WINDOW_SECS"),
                defaults.global_window.as_secs(),
            )),
        }
    }
}

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limit exceeded (max {limit} requests/{window_secs}s)")]
    PerKeyExceeded { limit: usize, window_secs: u64 },
    #[error("global rate limit exceeded (max {limit} requests/{window_secs}s)")]
    GlobalExceeded { limit: usize, window_secs: u64 },
}

// =============================================================================
// RATE LIMITER
// =============================================================================

#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<RateLimiterInner>>,
    config: RateLimitConfig,
}

struct RateLimiterInner {
    /// Per-key request timestamps.
    key_requests: HashMap<String, VecDeque<Instant>>,
    /// Global request timestamps.
    global_requests: VecDeque<Instant>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RateLimiterInner {
                key_requests: HashMap::new(),
                global_requests: VecDeque::new(),
            })),
            config,
        }
    }

    /// Check both per-key and global limits, then record the request.
    ///
    /// # Errors
    ///
    /// Returns which limit was hit; nothing is recorded in that case.
    pub fn check_and_record(&self, key: &str) -> Result<(), RateLimitError> {
        self.check_and_record_at(key, Instant::now())
    }

    fn check_and_record_at(&self, key: &str, now: Instant) -> Result<(), RateLimitError> {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let cfg = self.config;

        prune_window(&mut inner.global_requests, now, cfg.global_window);
        if inner.global_requests.len() >= cfg.global_limit {
            return Err(RateLimitError::GlobalExceeded {
                limit: cfg.global_limit,
                window_secs: cfg.global_window.as_secs(),
            });
        }

        inner.key_requests.retain(|_, deque| {
            prune_window(deque, now, cfg.per_key_window);
            !deque.is_empty()
        });

        let key_deque = inner.key_requests.entry(key.to_owned()).or_default();
        if key_deque.len() >= cfg.per_key_limit {
            return Err(RateLimitError::PerKeyExceeded {
                limit: cfg.per_key_limit,
                window_secs: cfg.per_key_window.as_secs(),
            });
        }

        key_deque.push_back(now);
        inner.global_requests.push_back(now);
        Ok(())
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .key_requests
            .len()
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn prune_window(deque: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&front) = deque.front() {
        if now.duration_since(front) > window {
            deque.pop_front();
        } else {
            break;
        }
    }
}

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
