//! Repository for chat message persistence.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use super::models::{ChatMessage, NewChatMessage};

/// Append-only store for chat messages.
#[derive(Debug, Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    /// Create a new repository instance.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Durably record a message, returning it with its assigned ID.
    ///
    /// Storage failures surface to the caller; a message is never silently
    /// dropped.
    pub async fn append(&self, message: NewChatMessage) -> Result<ChatMessage> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO messages (sender_id, sender_name, body, sent_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&message.sender_id)
        .bind(&message.sender_name)
        .bind(&message.body)
        .bind(message.sent_at)
        .fetch_one(&self.pool)
        .await
        .context("inserting chat message")?;

        self.get_by_id(id).await
    }

    /// Get a message by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<ChatMessage> {
        sqlx::query_as::<_, ChatMessage>(
            "SELECT id, sender_id, sender_name, body, sent_at FROM messages WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .context("fetching chat message")
    }

    /// Get at most `limit` most recent messages, oldest first.
    ///
    /// Rows are fetched newest-first and reversed so callers get them ready
    /// for chronological display. Insertion order breaks timestamp ties.
    pub async fn recent(&self, limit: i64) -> Result<Vec<ChatMessage>> {
        let mut messages = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT id, sender_id, sender_name, body, sent_at
            FROM messages
            ORDER BY sent_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("fetching recent chat messages")?;

        messages.reverse();
        Ok(messages)
    }

    /// Count total stored messages.
    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool)
            .await
            .context("counting chat messages")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use chrono::{Duration, Utc};

    async fn setup() -> MessageRepository {
        let db = Database::in_memory().await.unwrap();
        MessageRepository::new(db.pool().clone())
    }

    fn message(body: &str, offset_secs: i64) -> NewChatMessage {
        NewChatMessage {
            sender_id: "usr_1".to_string(),
            sender_name: "Alice".to_string(),
            body: body.to_string(),
            sent_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[tokio::test]
    async fn test_append_assigns_ids() {
        let repo = setup().await;

        let first = repo.append(message("one", 0)).await.unwrap();
        let second = repo.append(message("two", 1)).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.body, "one");
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_recent_returns_last_k_ascending() {
        let repo = setup().await;

        for i in 0..10 {
            repo.append(message(&format!("m{i}"), i)).await.unwrap();
        }

        let recent = repo.recent(4).await.unwrap();
        let bodies: Vec<_> = recent.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, ["m6", "m7", "m8", "m9"]);
        assert!(recent.windows(2).all(|w| w[0].sent_at <= w[1].sent_at));
    }

    #[tokio::test]
    async fn test_recent_bounded_by_limit() {
        let repo = setup().await;

        for i in 0..60 {
            repo.append(message(&format!("m{i}"), i)).await.unwrap();
        }

        let recent = repo.recent(50).await.unwrap();
        assert_eq!(recent.len(), 50);
        assert_eq!(recent.first().unwrap().body, "m10");
        assert_eq!(recent.last().unwrap().body, "m59");
    }

    #[tokio::test]
    async fn test_recent_with_fewer_than_limit() {
        let repo = setup().await;

        repo.append(message("only", 0)).await.unwrap();

        let recent = repo.recent(50).await.unwrap();
        assert_eq!(recent.len(), 1);
    }

    #[tokio::test]
    async fn test_recent_breaks_timestamp_ties_by_insertion() {
        let repo = setup().await;

        let ts = Utc::now();
        for body in ["a", "b", "c"] {
            repo.append(NewChatMessage {
                sender_id: "usr_1".to_string(),
                sender_name: "Alice".to_string(),
                body: body.to_string(),
                sent_at: ts,
            })
            .await
            .unwrap();
        }

        let recent = repo.recent(10).await.unwrap();
        let bodies: Vec<_> = recent.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, ["a", "b", "c"]);
    }
}
