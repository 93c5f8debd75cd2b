use acctrack_backend::config::{AppConfig, DatabaseConfig, PasswordConfig};
use acctrack_backend::models::*;
use acctrack_backend::repositories::Slice;
use acctrack_backend::services::transactions_to_csv;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

fn group_entry(user_id: Uuid, name: &str, kind: TransactionKind, amount: i64) -> GroupTransaction {
    GroupTransaction {
        id: Uuid::new_v4(),
        group_id: Uuid::nil(),
        user_id,
        user_name: name.to_string(),
        kind,
        category: "Shared".to_string(),
        amount: Decimal::new(amount, 0),
        description: String::new(),
        transaction_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        created_at: NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap(),
    }
}

// ============================================================================
// Totals
// ============================================================================

#[test]
fn test_group_totals_match_scenario() {
    let user = Uuid::new_v4();
    let totals = compute_totals(&[
        group_entry(user, "Alice", TransactionKind::Income, 1000),
        group_entry(user, "Alice", TransactionKind::Expense, 800),
    ])
    .unwrap();

    assert_eq!(totals.balance, Decimal::new(200, 0));
    let summary = LedgerSummary::from(totals);
    assert!(summary.warning);
}

#[test]
fn test_member_contributions_are_independent_sums() {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let entries = vec![
        group_entry(bob, "Bob", TransactionKind::Expense, 40),
        group_entry(alice, "Alice", TransactionKind::Income, 500),
        group_entry(bob, "Bob", TransactionKind::Income, 60),
        group_entry(alice, "Alice", TransactionKind::Expense, 100),
        group_entry(bob, "Bob", TransactionKind::Expense, 10),
    ];

    let contributions = member_contributions(&entries).unwrap();
    assert_eq!(contributions.len(), 2);

    assert_eq!(contributions[0].name, "Bob");
    assert_eq!(contributions[0].contributed, Decimal::new(60, 0));
    assert_eq!(contributions[0].spent, Decimal::new(50, 0));

    assert_eq!(contributions[1].name, "Alice");
    assert_eq!(contributions[1].contributed, Decimal::new(500, 0));
    assert_eq!(contributions[1].spent, Decimal::new(100, 0));
}

#[test]
fn test_member_contribution_overflow_is_an_error() {
    let alice = Uuid::new_v4();
    let mut first = group_entry(alice, "Alice", TransactionKind::Income, 0);
    first.amount = Decimal::MAX;
    let second = first.clone();

    let result = member_contributions(&[first, second]);
    assert!(matches!(result, Err(acctrack_backend::error::AppError::Overflow(_))));
}

// ============================================================================
// CSV
// ============================================================================

#[test]
fn test_csv_row_layout() {
    let id = Uuid::new_v4();
    let transaction = Transaction {
        id,
        user_id: Uuid::nil(),
        kind: TransactionKind::Income,
        category: "Salary".to_string(),
        amount: Decimal::new(250075, 2),
        description: "line one\nline two".to_string(),
        transaction_date: NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
        created_at: NaiveDate::from_ymd_opt(2026, 9, 1)
            .unwrap()
            .and_hms_opt(8, 5, 3)
            .unwrap(),
    };

    let csv = String::from_utf8(transactions_to_csv(&[transaction])).unwrap();
    let expected = format!(
        "ID,Type,Category,Amount,Description,Transaction Date,Created At\r\n\
         {},income,Salary,2500.75,\"line one\nline two\",2026-08-31,2026-09-01 08:05:03\r\n",
        id
    );
    assert_eq!(csv, expected);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_default_config_is_usable() {
    let config = AppConfig::default();
    assert!(config.database_url().starts_with("sqlite:"));
    assert!(config.is_development());
    assert!(!config.is_production());
}

#[test]
fn test_in_memory_database_config() {
    let config = DatabaseConfig::in_memory();
    assert!(config.is_in_memory());
    assert!(!DatabaseConfig::default().is_in_memory());
}

#[test]
fn test_fast_password_config_is_cheap() {
    let fast = PasswordConfig::fast_insecure();
    let default = PasswordConfig::default();
    assert!(fast.memory_kib < default.memory_kib);
    assert!(fast.memory_kib >= 8 * fast.parallelism);
}

#[test]
fn test_slice_defaults_to_everything() {
    assert_eq!(Slice::default(), Slice::all());
    assert_eq!(Slice::all().limit, None);
    assert_eq!(Slice::page(10, 0).limit, Some(10));
}
