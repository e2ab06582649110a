mod config;
mod db;
mod rate_limit;
mod routes;
mod services;
mod state;

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::services::message_log::{self, MessageLog, PgMessageLog};

const PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);
const CHAT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let pool = match db::init_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "database init failed");
            std::process::exit(1);
        }
    };

    if config.admin.emails.is_empty() {
        tracing::warn!("ADMIN_EMAILS is empty; admin login disabled");
    } else if config.admin.email.is_none() {
        tracing::warn!("RESEND_API_KEY/RESEND_FROM not set; admin codes cannot be delivered");
    }
    tracing::info!(
        match_mode = config.chat.match_mode.as_str(),
        idle_ttl_secs = config.chat.idle_ttl.as_secs(),
        "chat configured"
    );

    // Ordered writer for chat transcripts.
    let message_log: Arc<dyn MessageLog> = Arc::new(PgMessageLog::new(pool.clone()));
    let (message_tx, _writer) =
        message_log::spawn_message_writer(message_log.clone(), config.chat.persist_queue_capacity);

    let _purge = spawn_session_purge(pool.clone());

    let port = config.port;
    let state = state::AppState::new(pool, config, message_log, Some(message_tx));
    let _sweep = spawn_chat_sweep(state.clone());
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "campus-portal listening");
    axum::serve(listener, app).await.expect("server failed");
}

/// Periodically drop expired admin sessions and spent login codes.
fn spawn_session_purge(pool: sqlx::PgPool) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            match services::session::purge_expired(&pool).await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "purged expired admin auth rows"),
                Err(e) => tracing::warn!(error = %e, "admin auth purge failed"),
            }
        }
    })
}

/// Periodically evict idle chat transcripts from memory.
fn spawn_chat_sweep(state: state::AppState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CHAT_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let evicted = services::chat::evict_idle(&state, state.config.chat.idle_ttl).await;
            if evicted > 0 {
                tracing::debug!(evicted, "evicted idle chat transcripts");
            }
        }
    })
}
