use super::export::transactions_to_csv;
use super::require_membership;
use crate::auth::RequestContext;
use crate::error::{AppError, AppResult};
use crate::models::{
    compute_totals, GroupTransaction, LedgerSummary, Transaction, TransactionInput,
};
use crate::repositories::{
    GroupMemberRepository, GroupRepository, GroupTransactionRepository, Slice,
    TransactionRepository,
};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Service for the personal and group ledgers
pub struct LedgerService {
    transaction_repo: Arc<TransactionRepository>,
    group_transaction_repo: Arc<GroupTransactionRepository>,
    group_repo: Arc<GroupRepository>,
    member_repo: Arc<GroupMemberRepository>,
}

impl LedgerService {
    pub fn new(
        transaction_repo: Arc<TransactionRepository>,
        group_transaction_repo: Arc<GroupTransactionRepository>,
        group_repo: Arc<GroupRepository>,
        member_repo: Arc<GroupMemberRepository>,
    ) -> Self {
        Self {
            transaction_repo,
            group_transaction_repo,
            group_repo,
            member_repo,
        }
    }

    /// Record a transaction in the caller's ledger
    pub async fn add_transaction(
        &self,
        ctx: &RequestContext,
        input: &TransactionInput,
    ) -> AppResult<Transaction> {
        let valid = input.validated()?;
        let transaction = self.transaction_repo.create(ctx.user_id, &valid).await?;

        info!(
            "User {} added {} {} ({})",
            ctx.user_id,
            transaction.kind.as_str(),
            transaction.amount,
            transaction.id
        );
        Ok(transaction)
    }

    /// Replace every editable field of one of the caller's transactions
    pub async fn update_transaction(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: &TransactionInput,
    ) -> AppResult<Transaction> {
        let valid = input.validated()?;
        let transaction = self
            .transaction_repo
            .update(id, ctx.user_id, &valid)
            .await?
            .ok_or_else(|| AppError::NotFound("Transaction not found".into()))?;

        info!("User {} updated transaction {}", ctx.user_id, id);
        Ok(transaction)
    }

    /// Delete one of the caller's transactions; `false` if there was nothing to delete
    pub async fn delete_transaction(&self, ctx: &RequestContext, id: Uuid) -> AppResult<bool> {
        let deleted = self.transaction_repo.delete(id, ctx.user_id).await?;
        if deleted {
            info!("User {} deleted transaction {}", ctx.user_id, id);
        } else {
            debug!("Nothing to delete for {} (transaction {})", ctx.user_id, id);
        }
        Ok(deleted)
    }

    pub async fn get_transaction(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Transaction> {
        self.transaction_repo
            .find_for_user(id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Transaction not found".into()))
    }

    /// The caller's transactions, newest transaction date first
    pub async fn list_transactions(
        &self,
        ctx: &RequestContext,
        slice: Slice,
    ) -> AppResult<Vec<Transaction>> {
        Ok(self.transaction_repo.list_for_user(ctx.user_id, slice).await?)
    }

    /// Totals and overspending warning for the caller's whole ledger
    pub async fn summary(&self, ctx: &RequestContext) -> AppResult<LedgerSummary> {
        let transactions = self.transaction_repo.list_for_user(ctx.user_id, Slice::all()).await?;
        Ok(compute_totals(&transactions)?.into())
    }

    /// The caller's ledger as CSV
    pub async fn export_csv(&self, ctx: &RequestContext) -> AppResult<Vec<u8>> {
        let transactions = self.transaction_repo.list_for_user(ctx.user_id, Slice::all()).await?;
        debug!("Exporting {} transaction(s) for {}", transactions.len(), ctx.user_id);
        Ok(transactions_to_csv(&transactions))
    }

    /// Append to a group's shared ledger; members only
    pub async fn add_group_transaction(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
        input: &TransactionInput,
    ) -> AppResult<GroupTransaction> {
        require_membership(&self.group_repo, &self.member_repo, group_id, ctx.user_id).await?;
        let valid = input.validated()?;
        let transaction = self
            .group_transaction_repo
            .create(group_id, ctx.user_id, &valid)
            .await?;

        info!(
            "User {} added {} {} to group {}",
            ctx.user_id,
            transaction.kind.as_str(),
            transaction.amount,
            group_id
        );
        Ok(transaction)
    }

    /// A group's ledger with member names, newest transaction date first
    pub async fn list_group_transactions(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
        slice: Slice,
    ) -> AppResult<Vec<GroupTransaction>> {
        require_membership(&self.group_repo, &self.member_repo, group_id, ctx.user_id).await?;
        Ok(self.group_transaction_repo.list_for_group(group_id, slice).await?)
    }
}
