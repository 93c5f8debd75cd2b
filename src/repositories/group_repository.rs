use super::Slice;
use crate::models::{Group, GroupView, MemberRole};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Result as SqlxResult, Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Repository for group data access
pub struct GroupRepository {
    pool: SqlitePool,
}

impl GroupRepository {
    /// Create a new GroupRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a group on an open connection
    pub async fn insert(conn: &mut SqliteConnection, group: &Group) -> SqlxResult<()> {
        sqlx::query(
            r#"
            INSERT INTO groups (id, name, bio, password, created_by, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(group.id)
        .bind(&group.name)
        .bind(&group.bio)
        .bind(&group.password_hash)
        .bind(group.created_by)
        .bind(group.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Find a group by ID
    pub async fn find_by_id(&self, id: Uuid) -> SqlxResult<Option<Group>> {
        sqlx::query_as::<_, Group>(
            r#"
            SELECT id, name, bio, password, created_by, created_at
            FROM groups
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Groups the user belongs to, newest membership first, with role and size
    pub async fn list_for_user(&self, user_id: Uuid, slice: Slice) -> SqlxResult<Vec<GroupView>> {
        let rows = sqlx::query(
            r#"
            SELECT g.id, g.name, g.bio, g.password, g.created_by, g.created_at,
                   gm.is_admin,
                   (SELECT COUNT(*) FROM group_members c WHERE c.group_id = g.id) AS member_count
            FROM groups g
            JOIN group_members gm ON gm.group_id = g.id
            WHERE gm.user_id = ?
            ORDER BY gm.joined_at DESC, gm.rowid DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id)
        .bind(slice.sql_limit())
        .bind(slice.sql_offset())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(group_view).collect()
    }
}

fn group_view(row: &SqliteRow) -> SqlxResult<GroupView> {
    Ok(GroupView {
        group: Group::from_row(row)?,
        role: MemberRole::from_flag(row.try_get("is_admin")?),
        member_count: row.try_get("member_count")?,
    })
}
