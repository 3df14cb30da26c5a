//! Chat message models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One durable chat message.
///
/// Sender identity is denormalized at send time; it is not re-resolved if
/// the account's display name changes later.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatMessage {
    /// Assigned by the store at append time.
    pub id: i64,
    pub sender_id: String,
    pub sender_name: String,
    pub body: String,
    /// Server-assigned receipt time; the sole ordering key.
    pub sent_at: DateTime<Utc>,
}

/// A message about to be persisted.
#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub sender_id: String,
    pub sender_name: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}
