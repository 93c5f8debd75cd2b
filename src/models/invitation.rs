use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use std::fmt;
use uuid::Uuid;

/// Lifecycle of an invitation: `Pending` moves once, to one of the terminal states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invitee's answer to an invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    /// Status the invitation ends in for this decision
    pub fn outcome(&self) -> InvitationStatus {
        match self {
            Decision::Accept => InvitationStatus::Accepted,
            Decision::Reject => InvitationStatus::Rejected,
        }
    }
}

/// Invitation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: Uuid,
    pub group_id: Uuid,
    pub inviter_id: Uuid,
    pub invitee_id: Uuid,
    pub status: InvitationStatus,
    pub is_seen: bool,
    pub created_at: NaiveDateTime,
}

impl Invitation {
    /// Create a new pending, unseen invitation
    pub fn new(group_id: Uuid, inviter_id: Uuid, invitee_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            inviter_id,
            invitee_id,
            status: InvitationStatus::Pending,
            is_seen: false,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }
}

fn decode_status(row: &SqliteRow) -> Result<InvitationStatus, sqlx::Error> {
    let raw: String = row.try_get("status")?;
    InvitationStatus::from_str(&raw).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: format!("unknown invitation status: {}", raw).into(),
    })
}

impl<'r> FromRow<'r, SqliteRow> for Invitation {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            group_id: row.try_get("group_id")?,
            inviter_id: row.try_get("inviter_id")?,
            invitee_id: row.try_get("invitee_id")?,
            status: decode_status(row)?,
            is_seen: row.try_get("is_seen")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Pending invitation with group and inviter names, as shown in the notification panel
#[derive(Debug, Clone, Serialize)]
pub struct PendingInvitation {
    pub invitation: Invitation,
    pub group_name: String,
    pub inviter_name: String,
}

impl<'r> FromRow<'r, SqliteRow> for PendingInvitation {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            invitation: Invitation::from_row(row)?,
            group_name: row.try_get("group_name")?,
            inviter_name: row.try_get("inviter_name")?,
        })
    }
}
