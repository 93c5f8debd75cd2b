use super::Slice;
use crate::models::{GroupTransaction, NewTransaction};
use sqlx::{Result as SqlxResult, SqlitePool};
use uuid::Uuid;

/// Repository for the shared group ledger. Rows are never edited or removed.
pub struct GroupTransactionRepository {
    pool: SqlitePool,
}

impl GroupTransactionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a transaction recorded by `user_id` to `group_id`'s ledger
    pub async fn create(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        input: &NewTransaction,
    ) -> SqlxResult<GroupTransaction> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO group_transactions
                (id, group_id, user_id, type, category, amount, description, transaction_date, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(group_id)
        .bind(user_id)
        .bind(input.kind.as_str())
        .bind(&input.category)
        .bind(input.amount.to_string())
        .bind(&input.description)
        .bind(input.transaction_date)
        .bind(chrono::Utc::now().naive_utc())
        .execute(&self.pool)
        .await?;

        sqlx::query_as::<_, GroupTransaction>(
            r#"
            SELECT t.id, t.group_id, t.user_id, u.name AS user_name, t.type, t.category,
                   t.amount, t.description, t.transaction_date, t.created_at
            FROM group_transactions t
            JOIN users u ON u.id = t.user_id
            WHERE t.id = ?
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
    }

    /// A group's ledger with each recorder's name, latest transaction date first
    pub async fn list_for_group(&self, group_id: Uuid, slice: Slice) -> SqlxResult<Vec<GroupTransaction>> {
        sqlx::query_as::<_, GroupTransaction>(
            r#"
            SELECT t.id, t.group_id, t.user_id, u.name AS user_name, t.type, t.category,
                   t.amount, t.description, t.transaction_date, t.created_at
            FROM group_transactions t
            JOIN users u ON u.id = t.user_id
            WHERE t.group_id = ?
            ORDER BY t.transaction_date DESC, t.created_at DESC, t.rowid DESC
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
