//! Ledger models shared by the personal and group ledgers

use crate::error::{AppError, AppResult, ValidationErrors};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Direction of a ledger entry; amounts themselves are always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

/// Anything that contributes to a ledger total
pub trait LedgerEntry {
    fn kind(&self) -> TransactionKind;
    fn amount(&self) -> Decimal;
}

/// Personal transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: TransactionKind,
    pub category: String,
    pub amount: Decimal,
    pub description: String,
    pub transaction_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

impl LedgerEntry for Transaction {
    fn kind(&self) -> TransactionKind {
        self.kind
    }

    fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Shared transaction appended to a group's ledger by one of its members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTransaction {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub kind: TransactionKind,
    pub category: String,
    pub amount: Decimal,
    pub description: String,
    pub transaction_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

impl LedgerEntry for GroupTransaction {
    fn kind(&self) -> TransactionKind {
        self.kind
    }

    fn amount(&self) -> Decimal {
        self.amount
    }
}

fn decode_kind(row: &SqliteRow) -> Result<TransactionKind, sqlx::Error> {
    let raw: String = row.try_get("type")?;
    TransactionKind::from_str(&raw).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: "type".to_string(),
        source: format!("unknown transaction type: {}", raw).into(),
    })
}

// Amounts are stored as decimal text
fn decode_amount(row: &SqliteRow) -> Result<Decimal, sqlx::Error> {
    let raw: String = row.try_get("amount")?;
    raw.parse::<Decimal>().map_err(|e| sqlx::Error::ColumnDecode {
        index: "amount".to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, SqliteRow> for Transaction {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            kind: decode_kind(row)?,
            category: row.try_get("category")?,
            amount: decode_amount(row)?,
            description: row.try_get("description")?,
            transaction_date: row.try_get("transaction_date")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl<'r> FromRow<'r, SqliteRow> for GroupTransaction {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            group_id: row.try_get("group_id")?,
            user_id: row.try_get("user_id")?,
            user_name: row.try_get("user_name")?,
            kind: decode_kind(row)?,
            category: row.try_get("category")?,
            amount: decode_amount(row)?,
            description: row.try_get("description")?,
            transaction_date: row.try_get("transaction_date")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

// =========================================================================
// Input validation
// =========================================================================

const DATE_FORMAT: &str = "%Y-%m-%d";

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_kind(kind: &str) -> Result<(), ValidationError> {
    TransactionKind::from_str(kind)
        .map(|_| ())
        .ok_or_else(|| invalid("kind", "Transaction type is invalid."))
}

/// Largest amount a single entry may carry (10^15)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Amounts are currency values with at most two decimal places
const AMOUNT_SCALE: u32 = 2;

fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        return Err(invalid("amount", "Amount must be greater than 0."));
    }
    if *amount > MAX_AMOUNT {
        return Err(invalid("max", "Amount must not exceed 1000000000000000."));
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(invalid("scale", "Amount must have at most 2 decimal places."));
    }
    Ok(())
}

fn validate_date(date: &str) -> Result<(), ValidationError> {
    if date.is_empty() {
        return Err(invalid("required", "Transaction date is required."));
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| invalid("format", "Transaction date must be a valid date (YYYY-MM-DD)."))
}

/// Raw transaction fields as submitted by a form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TransactionInput {
    #[validate(custom(function = "validate_kind"))]
    #[serde(rename = "type")]
    pub kind: String,
    #[validate(length(min = 1, message = "Category is required."))]
    pub category: String,
    #[validate(custom(function = "validate_amount"))]
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "validate_date"))]
    pub transaction_date: String,
}

/// Field order used when reporting validation failures.
///
/// `kind` is listed under both names since the derive may key it by its serde name.
const TRANSACTION_FIELDS: &[&str] = &["kind", "type", "category", "amount", "transaction_date"];

impl TransactionInput {
    pub fn new(
        kind: impl Into<String>,
        category: impl Into<String>,
        amount: Decimal,
        description: impl Into<String>,
        transaction_date: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            category: category.into(),
            amount,
            description: description.into(),
            transaction_date: transaction_date.into(),
        }
    }

    /// Trim, validate every field and convert into typed values.
    ///
    /// All violations come back together in a single `AppError::Validation`.
    pub fn validated(&self) -> AppResult<NewTransaction> {
        let trimmed = Self {
            kind: self.kind.trim().to_string(),
            category: self.category.trim().to_string(),
            amount: self.amount,
            description: self.description.trim().to_string(),
            transaction_date: self.transaction_date.trim().to_string(),
        };

        if let Err(errors) = trimmed.validate() {
            ValidationErrors::from_validator(&errors, TRANSACTION_FIELDS).into_result()?;
        }

        let kind = TransactionKind::from_str(&trimmed.kind)
            .ok_or_else(|| crate::error::AppError::validation("kind", "Transaction type is invalid."))?;
        let transaction_date = NaiveDate::parse_from_str(&trimmed.transaction_date, DATE_FORMAT)
            .map_err(|_| {
                crate::error::AppError::validation(
                    "transaction_date",
                    "Transaction date must be a valid date (YYYY-MM-DD).",
                )
            })?;

        Ok(NewTransaction {
            kind,
            category: trimmed.category,
            amount: trimmed.amount,
            description: trimmed.description,
            transaction_date,
        })
    }
}

/// Validated transaction fields, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub category: String,
    pub amount: Decimal,
    pub description: String,
    pub transaction_date: NaiveDate,
}

// =========================================================================
// Aggregates
// =========================================================================

/// Income, expense and balance over a set of ledger entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

impl Totals {
    /// True once spending passes 70% of a positive income
    pub fn warning(&self) -> bool {
        self.income > Decimal::ZERO && self.expense > self.income * Decimal::new(7, 1)
    }
}

fn add_amount(sum: Decimal, amount: Decimal) -> AppResult<Decimal> {
    sum.checked_add(amount)
        .ok_or_else(|| AppError::Overflow(format!("{} + {}", sum, amount)))
}

/// Sum entries by kind; balance is income minus expense
pub fn compute_totals<E: LedgerEntry>(entries: &[E]) -> AppResult<Totals> {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;

    for entry in entries {
        match entry.kind() {
            TransactionKind::Income => income = add_amount(income, entry.amount())?,
            TransactionKind::Expense => expense = add_amount(expense, entry.amount())?,
        }
    }

    let balance = income
        .checked_sub(expense)
        .ok_or_else(|| AppError::Overflow(format!("{} - {}", income, expense)))?;

    Ok(Totals {
        income,
        expense,
        balance,
    })
}

/// Totals plus the derived overspending flag, as shown on a dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub totals: Totals,
    pub warning: bool,
}

impl From<Totals> for LedgerSummary {
    fn from(totals: Totals) -> Self {
        Self {
            warning: totals.warning(),
            totals,
        }
    }
}

/// One member's share of a group ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberContribution {
    pub user_id: Uuid,
    pub name: String,
    /// Sum of the member's income entries
    pub contributed: Decimal,
    /// Sum of the member's expense entries
    pub spent: Decimal,
}

/// Per-member income and expense sums, in order of first appearance
pub fn member_contributions(entries: &[GroupTransaction]) -> AppResult<Vec<MemberContribution>> {
    let mut out: Vec<MemberContribution> = Vec::new();

    for entry in entries {
        let idx = match out.iter().position(|c| c.user_id == entry.user_id) {
            Some(idx) => idx,
            None => {
                out.push(MemberContribution {
                    user_id: entry.user_id,
                    name: entry.user_name.clone(),
                    contributed: Decimal::ZERO,
                    spent: Decimal::ZERO,
                });
                out.len() - 1
            }
        };

        let member = &mut out[idx];
        match entry.kind {
            TransactionKind::Income => member.contributed = add_amount(member.contributed, entry.amount)?,
            TransactionKind::Expense => member.spent = add_amount(member.spent, entry.amount)?,
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: TransactionKind, amount: i64) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            kind,
            category: "General".to_string(),
            amount: Decimal::new(amount, 0),
            description: String::new(),
            transaction_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_totals_and_warning() {
        let totals = compute_totals(&[
            entry(TransactionKind::Income, 1000),
            entry(TransactionKind::Expense, 800),
        ])
        .unwrap();

        assert_eq!(totals.income, Decimal::new(1000, 0));
        assert_eq!(totals.expense, Decimal::new(800, 0));
        assert_eq!(totals.balance, Decimal::new(200, 0));
        assert!(totals.warning());
    }

    #[test]
    fn test_warning_boundary_is_strict() {
        let totals = compute_totals(&[
            entry(TransactionKind::Income, 1000),
            entry(TransactionKind::Expense, 700),
        ])
        .unwrap();
        assert!(!totals.warning());
    }

    #[test]
    fn test_no_warning_without_income() {
        let totals = compute_totals(&[entry(TransactionKind::Expense, 50)]).unwrap();
        assert_eq!(totals.balance, Decimal::new(-50, 0));
        assert!(!totals.warning());
    }

    #[test]
    fn test_empty_ledger() {
        let totals = compute_totals::<Transaction>(&[]).unwrap();
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn test_valid_input_is_trimmed() {
        let input = TransactionInput::new(" income ", "  Salary ", Decimal::new(150050, 2), " June ", "2026-06-30");
        let valid = input.validated().unwrap();

        assert_eq!(valid.kind, TransactionKind::Income);
        assert_eq!(valid.category, "Salary");
        assert_eq!(valid.description, "June");
        assert_eq!(valid.amount, Decimal::new(150050, 2));
        assert_eq!(valid.transaction_date, NaiveDate::from_ymd_opt(2026, 6, 30).unwrap());
    }

    #[test]
    fn test_all_violations_reported_in_order() {
        let input = TransactionInput::new("transfer", "   ", Decimal::ZERO, "", "");
        let err = input.validated().unwrap_err();

        match err {
            crate::error::AppError::Validation(errors) => assert_eq!(
                errors.messages(),
                vec![
                    "Transaction type is invalid.",
                    "Category is required.",
                    "Amount must be greater than 0.",
                    "Transaction date is required.",
                ]
            ),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_date_and_negative_amount() {
        let input = TransactionInput::new("expense", "Food", Decimal::new(-5, 0), "", "30/06/2026");
        let err = input.validated().unwrap_err();

        match err {
            crate::error::AppError::Validation(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.has_field("amount"));
                assert!(errors.has_field("transaction_date"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_amount_upper_bound_and_scale() {
        assert!(TransactionInput::new("income", "Salary", MAX_AMOUNT, "", "2026-01-01")
            .validated()
            .is_ok());
        assert!(TransactionInput::new("income", "Salary", Decimal::new(12500, 3), "", "2026-01-01")
            .validated()
            .is_ok());

        let input = TransactionInput::new("income", "   ", Decimal::MAX, "", "2026-01-01");
        match input.validated().unwrap_err() {
            crate::error::AppError::Validation(errors) => assert_eq!(
                errors.messages(),
                vec!["Category is required.", "Amount must not exceed 1000000000000000."]
            ),
            other => panic!("expected validation error, got {:?}", other),
        }

        let input = TransactionInput::new("income", "Salary", Decimal::new(1001, 3), "", "2026-01-01");
        match input.validated().unwrap_err() {
            crate::error::AppError::Validation(errors) => assert_eq!(
                errors.messages(),
                vec!["Amount must have at most 2 decimal places."]
            ),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_totals_overflow_is_an_error() {
        let mut huge = entry(TransactionKind::Income, 0);
        huge.amount = Decimal::MAX;

        let result = compute_totals(&[huge.clone(), huge.clone()]);
        assert!(matches!(result, Err(AppError::Overflow(_))));

        let mut spent = huge;
        spent.kind = TransactionKind::Expense;
        let mut credit = entry(TransactionKind::Income, 0);
        credit.amount = Decimal::MIN;
        let result = compute_totals(&[credit, spent]);
        assert!(matches!(result, Err(AppError::Overflow(_))));
    }
}
