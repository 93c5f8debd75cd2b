#![allow(dead_code)]

use acctrack_backend::auth::{PasswordHasher, RequestContext};
use acctrack_backend::config::{DatabaseConfig, PasswordConfig};
use acctrack_backend::database::{create_pool, run_migrations};
use acctrack_backend::models::*;
use acctrack_backend::services::RegisterRequest;
use acctrack_backend::AppState;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use uuid::Uuid;

pub const USER_PASSWORD: &str = "Secret123";

/// Fresh in-memory database with migrations applied and all services wired
pub struct TestDatabase {
    pub pool: SqlitePool,
    pub state: AppState,
}

impl TestDatabase {
    /// Create a new isolated test database
    pub async fn new() -> Self {
        let pool = create_pool(&DatabaseConfig::in_memory())
            .await
            .expect("Failed to create test database pool");

        run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let hasher = PasswordHasher::new(&PasswordConfig::fast_insecure())
            .expect("Failed to build password hasher");

        Self {
            state: AppState::new(pool.clone(), hasher),
            pool,
        }
    }

    /// Number of membership rows for a group
    pub async fn member_count(&self, group_id: Uuid) -> i64 {
        self.state
            .group_member_repo
            .count_by_group(group_id)
            .await
            .expect("Failed to count members")
    }
}

/// Register a user and return the stored account with a context for it
pub async fn create_test_user(db: &TestDatabase, name: &str) -> (User, RequestContext) {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    let request = RegisterRequest::new(name, email, USER_PASSWORD, USER_PASSWORD, "Individual");
    let user = db
        .state
        .accounts
        .register(&request)
        .await
        .expect("Failed to register test user");
    let ctx = RequestContext::new(user.id);
    (user, ctx)
}

/// Create a group owned by `owner`
pub async fn create_test_group(
    db: &TestDatabase,
    owner: &RequestContext,
    name: &str,
    password: &str,
) -> Group {
    db.state
        .groups
        .create_group(owner, name, "Shared expenses", password)
        .await
        .expect("Failed to create test group")
}

/// Transaction form with a whole-number amount
pub fn transaction_input(kind: &str, category: &str, amount: i64, date: &str) -> TransactionInput {
    TransactionInput::new(kind, category, Decimal::new(amount, 0), "", date)
}

/// Test data fixtures: an admin, a member and an outsider around one group
pub struct TestFixtures {
    pub admin: (User, RequestContext),
    pub member: (User, RequestContext),
    pub outsider: (User, RequestContext),
    pub group: Group,
}

pub const GROUP_PASSWORD: &str = "abc123";

impl TestFixtures {
    pub async fn create(db: &TestDatabase) -> Self {
        let admin = create_test_user(db, "Alice").await;
        let member = create_test_user(db, "Bob").await;
        let outsider = create_test_user(db, "Carol").await;

        let group = create_test_group(db, &admin.1, "Family", GROUP_PASSWORD).await;
        db.state
            .groups
            .verify_and_join(&member.1, group.id, GROUP_PASSWORD)
            .await
            .expect("Failed to add member");

        Self {
            admin,
            member,
            outsider,
            group,
        }
    }
}
