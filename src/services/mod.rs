//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence so route handlers can
//! stay focused on request decoding, cookies, and status mapping.

pub mod admin_auth;
pub mod chat;
pub mod forms;
pub mod intent;
pub mod message_log;
pub mod records;
pub mod session;
