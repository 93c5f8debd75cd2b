mod helpers;

use acctrack_backend::models::*;
use acctrack_backend::repositories::*;
use helpers::*;
use rust_decimal::Decimal;
use sqlx::Row;
use uuid::Uuid;

// ============================================================================
// Connection Pool Tests
// ============================================================================

#[tokio::test]
async fn test_connection_pool_creation() {
    let db = TestDatabase::new().await;

    let row = sqlx::query("SELECT 1 as test")
        .fetch_one(&db.pool)
        .await
        .expect("query failed");
    let value: i64 = row.get("test");
    assert_eq!(value, 1);
}

#[tokio::test]
async fn test_foreign_keys_are_enforced() {
    let db = TestDatabase::new().await;

    let result = sqlx::query(
        "INSERT INTO group_members (group_id, user_id, is_admin, joined_at) VALUES (?, ?, FALSE, ?)",
    )
    .bind(Uuid::new_v4())
    .bind(Uuid::new_v4())
    .bind(chrono::Utc::now().naive_utc())
    .execute(&db.pool)
    .await;

    assert!(result.is_err());
}

// ============================================================================
// Migration Tests
// ============================================================================

#[tokio::test]
async fn test_all_tables_exist() {
    let db = TestDatabase::new().await;

    for table in [
        "users",
        "groups",
        "group_members",
        "group_invitations",
        "group_chat",
        "transactions",
        "group_transactions",
    ] {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(table)
                .fetch_optional(&db.pool)
                .await
                .expect("query failed");
        assert!(row.is_some(), "missing table {}", table);
    }
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let db = TestDatabase::new().await;
    acctrack_backend::database::run_migrations(&db.pool)
        .await
        .expect("re-running migrations should be a no-op");
}

// ============================================================================
// Membership Storage Tests
// ============================================================================

#[tokio::test]
async fn test_membership_key_rejects_second_row() {
    let db = TestDatabase::new().await;
    let (_, admin) = create_test_user(&db, "Alice").await;
    let (bob, _) = create_test_user(&db, "Bob").await;
    let group = create_test_group(&db, &admin, "Family", "abc123").await;

    let mut conn = db.pool.acquire().await.unwrap();
    let first = GroupMemberRepository::add_member(&mut conn, group.id, bob.id, MemberRole::Member)
        .await
        .unwrap();
    let second = GroupMemberRepository::add_member(&mut conn, group.id, bob.id, MemberRole::Admin)
        .await
        .unwrap();
    drop(conn);

    assert!(first);
    assert!(!second);
    assert_eq!(db.member_count(group.id).await, 2);

    // The existing role is kept
    let role = db.state.group_member_repo.find_role(group.id, bob.id).await.unwrap();
    assert_eq!(role, Some(MemberRole::Member));
}

#[tokio::test]
async fn test_raw_duplicate_membership_insert_fails() {
    let db = TestDatabase::new().await;
    let (alice, admin) = create_test_user(&db, "Alice").await;
    let group = create_test_group(&db, &admin, "Family", "abc123").await;

    let result = sqlx::query(
        "INSERT INTO group_members (group_id, user_id, is_admin, joined_at) VALUES (?, ?, FALSE, ?)",
    )
    .bind(group.id)
    .bind(alice.id)
    .bind(chrono::Utc::now().naive_utc())
    .execute(&db.pool)
    .await;

    let err = result.expect_err("primary key should reject a second row");
    let repo_err: acctrack_backend::error::RepositoryError = err.into();
    assert!(matches!(
        repo_err,
        acctrack_backend::error::RepositoryError::Duplicate(_)
    ));
}

#[tokio::test]
async fn test_list_members_in_join_order() {
    let db = TestDatabase::new().await;
    let fixtures = TestFixtures::create(&db).await;

    let members = db
        .state
        .group_member_repo
        .list_details(fixtures.group.id, Slice::all())
        .await
        .unwrap();

    assert_eq!(members.len(), 2);
    assert_eq!(members[0].name, "Alice");
    assert_eq!(members[0].role, MemberRole::Admin);
    assert_eq!(members[1].name, "Bob");
    assert_eq!(members[1].role, MemberRole::Member);
}

// ============================================================================
// Ledger Storage Tests
// ============================================================================

#[tokio::test]
async fn test_amount_check_constraint() {
    let db = TestDatabase::new().await;
    let (alice, _) = create_test_user(&db, "Alice").await;

    let result = sqlx::query(
        r#"
        INSERT INTO transactions (id, user_id, type, category, amount, description, transaction_date, created_at)
        VALUES (?, ?, 'expense', 'Food', '0', '', '2026-01-01', ?)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(alice.id)
    .bind(chrono::Utc::now().naive_utc())
    .execute(&db.pool)
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_amounts_keep_their_precision() {
    let db = TestDatabase::new().await;
    let (alice, _) = create_test_user(&db, "Alice").await;

    let input = TransactionInput::new("income", "Salary", Decimal::new(123456789, 2), "", "2026-03-01")
        .validated()
        .unwrap();
    let created = db.state.transaction_repo.create(alice.id, &input).await.unwrap();
    let stored = db
        .state
        .transaction_repo
        .find_for_user(created.id, alice.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(stored.amount, Decimal::new(123456789, 2));
    assert_eq!(stored, created);
}

#[tokio::test]
async fn test_slice_limits_rows() {
    let db = TestDatabase::new().await;
    let (alice, _) = create_test_user(&db, "Alice").await;

    for day in 1..=5 {
        let input = transaction_input("expense", "Food", 10, &format!("2026-01-0{}", day))
            .validated()
            .unwrap();
        db.state.transaction_repo.create(alice.id, &input).await.unwrap();
    }

    let page = db
        .state
        .transaction_repo
        .list_for_user(alice.id, Slice::page(2, 1))
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].transaction_date.to_string(), "2026-01-04");
    assert_eq!(page[1].transaction_date.to_string(), "2026-01-03");

    let all = db
        .state
        .transaction_repo
        .list_for_user(alice.id, Slice::all())
        .await
        .unwrap();
    assert_eq!(all.len(), 5);
}

// ============================================================================
// Invitation Storage Tests
// ============================================================================

#[tokio::test]
async fn test_mark_seen_ignores_other_users() {
    let db = TestDatabase::new().await;
    let fixtures = TestFixtures::create(&db).await;
    let (carol, _) = &fixtures.outsider;
    let (bob, _) = &fixtures.member;

    let invitation = Invitation::new(fixtures.group.id, fixtures.admin.0.id, carol.id);
    db.state.invitation_repo.create(&invitation).await.unwrap();

    let updated = db
        .state
        .invitation_repo
        .mark_seen(bob.id, &[invitation.id])
        .await
        .unwrap();
    assert_eq!(updated, 0);
    assert_eq!(db.state.invitation_repo.count_unseen(carol.id).await.unwrap(), 1);

    let updated = db
        .state
        .invitation_repo
        .mark_seen(carol.id, &[invitation.id, Uuid::new_v4()])
        .await
        .unwrap();
    assert_eq!(updated, 1);
    assert_eq!(db.state.invitation_repo.count_unseen(carol.id).await.unwrap(), 0);

    // Nothing left to update
    let updated = db
        .state
        .invitation_repo
        .mark_seen(carol.id, &[invitation.id])
        .await
        .unwrap();
    assert_eq!(updated, 0);
    assert_eq!(db.state.invitation_repo.mark_seen(carol.id, &[]).await.unwrap(), 0);
}
