//! AccTrack Backend Library
//!
//! Personal and shared ledgers, password-gated groups, invitations and group
//! chat over a single SQLite database. This module exposes the backend
//! components for use by the binary and by tests.

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;

// Re-export commonly used types
pub use auth::{PasswordHasher, RequestContext};
pub use config::AppConfig;
pub use error::{AppError, AppResult, Credential};

use database::Database;
use repositories::*;
use services::*;
use std::sync::Arc;

/// Application state containing all repositories and services
pub struct AppState {
    pub database: Database,
    pub user_repo: Arc<UserRepository>,
    pub group_repo: Arc<GroupRepository>,
    pub group_member_repo: Arc<GroupMemberRepository>,
    pub invitation_repo: Arc<InvitationRepository>,
    pub transaction_repo: Arc<TransactionRepository>,
    pub group_transaction_repo: Arc<GroupTransactionRepository>,
    pub chat_repo: Arc<ChatRepository>,
    pub accounts: AccountService,
    pub groups: GroupService,
    pub invitations: InvitationService,
    pub ledger: LedgerService,
    pub chat: ChatService,
}

impl AppState {
    /// Wire repositories and services over one pool
    pub fn new(pool: sqlx::SqlitePool, hasher: PasswordHasher) -> Self {
        let database = Database::new(pool.clone());
        let hasher = Arc::new(hasher);

        let user_repo = Arc::new(UserRepository::new(pool.clone()));
        let group_repo = Arc::new(GroupRepository::new(pool.clone()));
        let group_member_repo = Arc::new(GroupMemberRepository::new(pool.clone()));
        let invitation_repo = Arc::new(InvitationRepository::new(pool.clone()));
        let transaction_repo = Arc::new(TransactionRepository::new(pool.clone()));
        let group_transaction_repo = Arc::new(GroupTransactionRepository::new(pool.clone()));
        let chat_repo = Arc::new(ChatRepository::new(pool));

        Self {
            accounts: AccountService::new(user_repo.clone(), hasher.clone()),
            groups: GroupService::new(
                database.clone(),
                group_repo.clone(),
                group_member_repo.clone(),
                user_repo.clone(),
                group_transaction_repo.clone(),
                hasher.clone(),
            ),
            invitations: InvitationService::new(
                database.clone(),
                invitation_repo.clone(),
                group_repo.clone(),
                group_member_repo.clone(),
                user_repo.clone(),
                hasher,
            ),
            ledger: LedgerService::new(
                transaction_repo.clone(),
                group_transaction_repo.clone(),
                group_repo.clone(),
                group_member_repo.clone(),
            ),
            chat: ChatService::new(chat_repo.clone(), group_repo.clone(), group_member_repo.clone()),
            database,
            user_repo,
            group_repo,
            group_member_repo,
            invitation_repo,
            transaction_repo,
            group_transaction_repo,
            chat_repo,
        }
    }
}
