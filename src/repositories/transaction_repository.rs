use super::Slice;
use crate::models::{NewTransaction, Transaction};
use sqlx::{Result as SqlxResult, SqlitePool};
use uuid::Uuid;

/// Repository for the personal ledger.
///
/// Every read and write is scoped by owner: a row that exists but belongs to
/// somebody else behaves exactly like a missing row.
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a transaction to `user_id`'s ledger
    pub async fn create(&self, user_id: Uuid, input: &NewTransaction) -> SqlxResult<Transaction> {
        let transaction = Transaction {
            id: Uuid::new_v4(),
            user_id,
            kind: input.kind,
            category: input.category.clone(),
            amount: input.amount,
            description: input.description.clone(),
            transaction_date: input.transaction_date,
            created_at: chrono::Utc::now().naive_utc(),
        };

        sqlx::query(
            r#"
            INSERT INTO transactions
                (id, user_id, type, category, amount, description, transaction_date, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id)
        .bind(transaction.user_id)
        .bind(transaction.kind.as_str())
        .bind(&transaction.category)
        .bind(transaction.amount.to_string())
        .bind(&transaction.description)
        .bind(transaction.transaction_date)
        .bind(transaction.created_at)
        .execute(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Find one of `user_id`'s transactions
    pub async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> SqlxResult<Option<Transaction>> {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, type, category, amount, description, transaction_date, created_at
            FROM transactions
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Overwrite the editable fields; `None` if no such row is owned by `user_id`
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        input: &NewTransaction,
    ) -> SqlxResult<Option<Transaction>> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE transactions
            SET type = ?, category = ?, amount = ?, description = ?, transaction_date = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(input.kind.as_str())
        .bind(&input.category)
        .bind(input.amount.to_string())
        .bind(&input.description)
        .bind(input.transaction_date)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Ok(None);
        }
        self.find_for_user(id, user_id).await
    }

    /// Delete one of `user_id`'s transactions
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> SqlxResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM transactions WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    /// `user_id`'s transactions, latest transaction date first
    pub async fn list_for_user(&self, user_id: Uuid, slice: Slice) -> SqlxResult<Vec<Transaction>> {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, type, category, amount, description, transaction_date, created_at
            FROM transactions
            WHERE user_id = ?
            ORDER BY transaction_date DESC, created_at DESC, rowid DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id)
        .bind(slice.sql_limit())
        .bind(slice.sql_offset())
        .fetch_all(&self.pool)
        .await
    }
}
