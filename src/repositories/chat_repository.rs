use super::Slice;
use crate::models::ChatMessage;
use sqlx::{Result as SqlxResult, SqlitePool};
use uuid::Uuid;

/// Repository for a group's activity feed
pub struct ChatRepository {
    pool: SqlitePool,
}

impl ChatRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a message and return it with the sender's name
    pub async fn create(&self, group_id: Uuid, user_id: Uuid, body: &str) -> SqlxResult<ChatMessage> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO group_chat (id, group_id, user_id, message, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(group_id)
        .bind(user_id)
        .bind(body)
        .bind(chrono::Utc::now().naive_utc())
        .execute(&self.pool)
        .await?;

        sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT c.id, c.group_id, c.user_id, u.name AS sender_name, c.message, c.created_at
            FROM group_chat c
            JOIN users u ON u.id = c.user_id
            WHERE c.id = ?
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
    }

    /// Messages in posting order; ties on timestamp fall back to insertion order
    pub async fn list_for_group(&self, group_id: Uuid, slice: Slice) -> SqlxResult<Vec<ChatMessage>> {
        sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT c.id, c.group_id, c.user_id, u.name AS sender_name, c.message, c.created_at
            FROM group_chat c
            JOIN users u ON u.id = c.user_id
            WHERE c.group_id = ?
            ORDER BY c.created_at ASC, c.rowid ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(group_id)
        .bind(slice.sql_limit())
        .bind(slice.sql_offset())
        .fetch_all(&self.pool)
        .await
    }
}
