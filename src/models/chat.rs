use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Longest chat message accepted, in characters
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Message in a group's activity feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub sender_name: String,
    #[sqlx(rename = "message")]
    pub body: String,
    pub created_at: NaiveDateTime,
}
