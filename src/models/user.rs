use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account type chosen at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccountType {
    #[default]
    Individual,
    Family,
    Company,
}

impl AccountType {
    /// Parse the stored/submitted label; unknown labels yield `None`
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Individual" => Some(AccountType::Individual),
            "Family" => Some(AccountType::Family),
            "Company" => Some(AccountType::Company),
            _ => None,
        }
    }

    /// Lenient parse used by registration: anything unknown is `Individual`
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s.trim()).unwrap_or_default()
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Individual => "Individual",
            AccountType::Family => "Family",
            AccountType::Company => "Company",
        }
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub account_type: String, // Stored as TEXT in DB, use AccountType for type safety
    pub created_at: NaiveDateTime,
}

impl User {
    /// Create a new User with an already-hashed password
    pub fn new(name: String, email: String, password_hash: String, account_type: AccountType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            account_type: account_type.as_str().to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Get the account type as an enum
    pub fn account_type_enum(&self) -> AccountType {
        AccountType::parse(&self.account_type).unwrap_or_default()
    }
}

/// Public projection of a user, used by member search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}
