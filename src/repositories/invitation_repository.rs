use super::Slice;
use crate::models::{Invitation, InvitationStatus, PendingInvitation};
use sqlx::{QueryBuilder, Result as SqlxResult, Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Repository for group invitations
pub struct InvitationRepository {
    pool: SqlitePool,
}

impl InvitationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new invitation
    pub async fn create(&self, invitation: &Invitation) -> SqlxResult<()> {
        sqlx::query(
            r#"
            INSERT INTO group_invitations
                (id, group_id, inviter_id, invitee_id, status, is_seen, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(invitation.id)
        .bind(invitation.group_id)
        .bind(invitation.inviter_id)
        .bind(invitation.invitee_id)
        .bind(invitation.status.as_str())
        .bind(invitation.is_seen)
        .bind(invitation.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find an invitation by ID
    pub async fn find_by_id(&self, id: Uuid) -> SqlxResult<Option<Invitation>> {
        sqlx::query_as::<_, Invitation>(
            r#"
            SELECT id, group_id, inviter_id, invitee_id, status, is_seen, created_at
            FROM group_invitations
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find an invitation addressed to `invitee_id`, on an open connection
    pub async fn find_for_invitee(
        conn: &mut SqliteConnection,
        id: Uuid,
        invitee_id: Uuid,
    ) -> SqlxResult<Option<Invitation>> {
        sqlx::query_as::<_, Invitation>(
            r#"
            SELECT id, group_id, inviter_id, invitee_id, status, is_seen, created_at
            FROM group_invitations
            WHERE id = ? AND invitee_id = ?
            "#,
        )
        .bind(id)
        .bind(invitee_id)
        .fetch_optional(conn)
        .await
    }

    /// Resolve a pending invitation. Resolved invitations are also marked seen.
    ///
    /// Returns `false` if the invitation was no longer pending.
    pub async fn resolve(
        conn: &mut SqliteConnection,
        id: Uuid,
        status: InvitationStatus,
    ) -> SqlxResult<bool> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE group_invitations
            SET status = ?, is_seen = TRUE
            WHERE id = ? AND status = 'pending'
            "#,
        )
        .bind(status.as_str())
        .bind(id)
        .execute(conn)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Accept every pending invitation of `invitee_id` to `group_id`
    pub async fn accept_pending_for(
        conn: &mut SqliteConnection,
        group_id: Uuid,
        invitee_id: Uuid,
    ) -> SqlxResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE group_invitations
            SET status = 'accepted', is_seen = TRUE
            WHERE group_id = ? AND invitee_id = ? AND status = 'pending'
            "#,
        )
        .bind(group_id)
        .bind(invitee_id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Mark the listed invitations seen; ids not addressed to `invitee_id` are skipped
    pub async fn mark_seen(&self, invitee_id: Uuid, ids: &[Uuid]) -> SqlxResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("UPDATE group_invitations SET is_seen = TRUE WHERE invitee_id = ");
        builder.push_bind(invitee_id);
        builder.push(" AND is_seen = FALSE AND id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Pending invitations for a user, oldest first, with group and inviter names
    pub async fn list_pending(&self, invitee_id: Uuid, slice: Slice) -> SqlxResult<Vec<PendingInvitation>> {
        sqlx::query_as::<_, PendingInvitation>(
            r#"
            SELECT i.id, i.group_id, i.inviter_id, i.invitee_id, i.status, i.is_seen, i.created_at,
                   g.name AS group_name, u.name AS inviter_name
            FROM group_invitations i
            JOIN groups g ON g.id = i.group_id
            JOIN users u ON u.id = i.inviter_id
            WHERE i.invitee_id = ? AND i.status = 'pending'
            ORDER BY i.created_at ASC, i.rowid ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(invitee_id)
        .bind(slice.sql_limit())
        .bind(slice.sql_offset())
        .fetch_all(&self.pool)
        .await
    }

    /// Number of pending invitations the user has not seen yet
    pub async fn count_unseen(&self, invitee_id: Uuid) -> SqlxResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM group_invitations
            WHERE invitee_id = ? AND status = 'pending' AND is_seen = FALSE
            "#,
        )
        .bind(invitee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
