use super::Slice;
use crate::models::{User, UserSummary};
use sqlx::{Result as SqlxResult, SqlitePool};
use uuid::Uuid;

/// Repository for user data access
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new user
    pub async fn create(&self, user: &User) -> SqlxResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password, account_type, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.account_type)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find a user by UUID
    pub async fn find_by_id(&self, id: Uuid) -> SqlxResult<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, account_type, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a user by email address
    pub async fn find_by_email(&self, email: &str) -> SqlxResult<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, account_type, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// Check whether an email is already registered
    pub async fn email_exists(&self, email: &str) -> SqlxResult<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM users WHERE email = ? LIMIT 1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Users whose name or email contains `term`, excluding members of `group_id`
    pub async fn search_outside_group(
        &self,
        group_id: Uuid,
        term: &str,
        slice: Slice,
    ) -> SqlxResult<Vec<UserSummary>> {
        let pattern = format!("%{}%", escape_like(term));
        sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.name, u.email
            FROM users u
            WHERE (u.name LIKE ?1 ESCAPE '\' OR u.email LIKE ?1 ESCAPE '\')
              AND u.id NOT IN (SELECT user_id FROM group_members WHERE group_id = ?2)
            ORDER BY u.name ASC, u.email ASC
            LIMIT ?3 OFFSET ?4
            "#,
        )
        .bind(pattern)
        .bind(group_id)
        .bind(slice.sql_limit())
        .bind(slice.sql_offset())
        .fetch_all(&self.pool)
        .await
    }
}

/// Escape LIKE wildcards so user input matches literally
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
