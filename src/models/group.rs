use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::MemberRole;

/// Group sharing one ledger and one chat, gated by a single password
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub bio: String,
    #[serde(skip_serializing)]
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub created_by: Uuid,
    pub created_at: NaiveDateTime,
}

impl Group {
    /// Create a new Group; `password_hash` must already be hashed
    pub fn new(name: String, bio: String, password_hash: String, created_by: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            bio,
            password_hash,
            created_by,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// A group as seen by one of its members
#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    pub group: Group,
    pub role: MemberRole,
    pub member_count: i64,
}
