use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

/// Member role in a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Member,
}

impl MemberRole {
    /// Convert from the stored `is_admin` flag
    pub fn from_flag(is_admin: bool) -> Self {
        if is_admin {
            MemberRole::Admin
        } else {
            MemberRole::Member
        }
    }

    /// Convert to the stored `is_admin` flag
    pub fn is_admin(&self) -> bool {
        matches!(self, MemberRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "admin",
            MemberRole::Member => "member",
        }
    }
}

/// Group Member model representing a user's membership in a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
    pub joined_at: NaiveDateTime,
}

impl GroupMember {
    /// Create a new GroupMember
    pub fn new(group_id: Uuid, user_id: Uuid, role: MemberRole) -> Self {
        Self {
            group_id,
            user_id,
            role,
            joined_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Check if member is an admin
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl<'r> FromRow<'r, SqliteRow> for GroupMember {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            group_id: row.try_get("group_id")?,
            user_id: row.try_get("user_id")?,
            role: MemberRole::from_flag(row.try_get("is_admin")?),
            joined_at: row.try_get("joined_at")?,
        })
    }
}

/// Member listing entry with the user's display name joined in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberDetail {
    pub user_id: Uuid,
    pub name: String,
    pub role: MemberRole,
    pub joined_at: NaiveDateTime,
}

impl<'r> FromRow<'r, SqliteRow> for MemberDetail {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            role: MemberRole::from_flag(row.try_get("is_admin")?),
            joined_at: row.try_get("joined_at")?,
        })
    }
}
