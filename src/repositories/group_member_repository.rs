use super::Slice;
use crate::models::{GroupMember, MemberDetail, MemberRole};
use sqlx::{Result as SqlxResult, SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Repository for group member data access
pub struct GroupMemberRepository {
    pool: SqlitePool,
}

impl GroupMemberRepository {
    /// Create a new GroupMemberRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a member to a group on an open connection.
    ///
    /// Returns `false` when the user already belonged to the group; the
    /// existing row and its role are left untouched.
    pub async fn add_member(
        conn: &mut SqliteConnection,
        group_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> SqlxResult<bool> {
        let rows_affected = sqlx::query(
            r#"
            INSERT INTO group_members (group_id, user_id, is_admin, joined_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (group_id, user_id) DO NOTHING
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(role.is_admin())
        .bind(chrono::Utc::now().naive_utc())
        .execute(conn)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Find a membership row on an open connection
    pub async fn find_in(
        conn: &mut SqliteConnection,
        group_id: Uuid,
        user_id: Uuid,
    ) -> SqlxResult<Option<GroupMember>> {
        sqlx::query_as::<_, GroupMember>(
            r#"
            SELECT group_id, user_id, is_admin, joined_at
            FROM group_members
            WHERE group_id = ? AND user_id = ?
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await
    }

    /// Get the role of a member in a group, on an open connection
    pub async fn find_role_in(
        conn: &mut SqliteConnection,
        group_id: Uuid,
        user_id: Uuid,
    ) -> SqlxResult<Option<MemberRole>> {
        let row: Option<(bool,)> = sqlx::query_as(
            r#"
            SELECT is_admin
            FROM group_members
            WHERE group_id = ? AND user_id = ?
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(|(is_admin,)| MemberRole::from_flag(is_admin)))
    }

    /// Get the role of a member in a group
    pub async fn find_role(&self, group_id: Uuid, user_id: Uuid) -> SqlxResult<Option<MemberRole>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_role_in(&mut conn, group_id, user_id).await
    }

    /// Check if a user is a member of a group
    pub async fn is_member(&self, group_id: Uuid, user_id: Uuid) -> SqlxResult<bool> {
        Ok(self.find_role(group_id, user_id).await?.is_some())
    }

    /// Members of a group with their names, in join order
    pub async fn list_details(&self, group_id: Uuid, slice: Slice) -> SqlxResult<Vec<MemberDetail>> {
        sqlx::query_as::<_, MemberDetail>(
            r#"
            SELECT gm.user_id, u.name, gm.is_admin, gm.joined_at
            FROM group_members gm
            JOIN users u ON u.id = gm.user_id
            WHERE gm.group_id = ?
            ORDER BY gm.joined_at ASC, gm.rowid ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(group_id)
        .bind(slice.sql_limit())
        .bind(slice.sql_offset())
        .fetch_all(&self.pool)
        .await
    }

    /// Get member count for a group
    pub async fn count_by_group(&self, group_id: Uuid) -> SqlxResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM group_members
            WHERE group_id = ?
            "#,
        )
        .bind(group_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
