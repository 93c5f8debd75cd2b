use crate::database::DatabaseError;
use serde::Serialize;
use sqlx::Error as SqlxError;
use std::fmt;
use thiserror::Error;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Accumulated validation failures, kept in field order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Messages in the order they were reported
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    /// Whether any failure was reported for `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was collected, otherwise the whole batch as an error
    pub fn into_result(self) -> AppResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }

    /// Flatten `validator` output, ordering by `fields`.
    ///
    /// Fields missing from `fields` are appended afterwards in name order so
    /// nothing reported by the derive is dropped.
    pub fn from_validator(
        source: &validator::ValidationErrors,
        fields: &[&'static str],
    ) -> Self {
        let mut out = Self::new();
        let field_errors = source.field_errors();

        for field in fields {
            if let Some(errors) = field_errors.get(*field) {
                for err in errors.iter() {
                    out.push(*field, describe(field, err));
                }
            }
        }

        let mut rest: Vec<(String, _)> = field_errors
            .iter()
            .map(|(name, errors)| (name.to_string(), errors))
            .filter(|(name, _)| !fields.iter().any(|f| *f == name.as_str()))
            .collect();
        rest.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, errors) in rest {
            for err in errors.iter() {
                let message = describe(&name, err);
                out.push(name.clone(), message);
            }
        }

        out
    }
}

fn describe(field: &str, err: &validator::ValidationError) -> String {
    err.message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("{} is invalid ({}).", field, err.code))
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join(" "))
    }
}

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// SQLx database errors
    #[error("SQL error: {0}")]
    Sqlx(#[from] SqlxError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Field-level validation errors, reported as one batch
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// Referenced entity does not exist (or is not visible to the caller)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Password mismatch, tagged with what the password was for
    #[error("Invalid {0} credentials")]
    InvalidCredentials(Credential),

    /// Authenticated but not allowed to perform the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Operation conflicts with current state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Password hashing failures (malformed stored hash, bad parameters)
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// A ledger aggregate left the representable decimal range
    #[error("Amount overflow: {0}")]
    Overflow(String),
}

/// Which secret a failed password check was against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    /// Login email and password
    Account,
    /// A group's shared password
    Group,
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Account => f.write_str("account"),
            Credential::Group => f.write_str("group"),
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Text shown for both unknown resources and wrong group passwords
pub const GENERIC_ACCESS_MESSAGE: &str = "Incorrect password or unknown group.";

/// Text shown for a failed login, whether the email or the password was wrong
pub const BAD_LOGIN_MESSAGE: &str = "Invalid email or password.";

impl AppError {
    /// Build a validation error carrying a single message
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.push(field, message);
        AppError::Validation(errors)
    }

    /// Check if error is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Get HTTP status code for the error
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::NotFound(_) => 404,
            AppError::InvalidCredentials(_) => 401,
            AppError::Forbidden(_) => 403,
            AppError::Validation(_) => 400,
            AppError::Conflict(_) => 409,
            AppError::Config(_) => 500,
            AppError::Database(_) | AppError::Sqlx(_) => 500,
            AppError::PasswordHash(_) | AppError::Overflow(_) => 500,
        }
    }

    /// Message safe to render to the end user.
    ///
    /// Missing groups and wrong group passwords share one text so a caller
    /// cannot probe which groups exist.
    pub fn public_message(&self) -> String {
        match self {
            AppError::NotFound(_) | AppError::InvalidCredentials(Credential::Group) => {
                GENERIC_ACCESS_MESSAGE.to_string()
            }
            AppError::InvalidCredentials(Credential::Account) => BAD_LOGIN_MESSAGE.to_string(),
            AppError::Validation(errors) => errors.to_string(),
            AppError::Forbidden(_) => "You do not have access to this resource.".to_string(),
            AppError::Conflict(msg) => msg.clone(),
            _ => "Something went wrong. Please try again later.".to_string(),
        }
    }
}

/// Repository-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Database query error
    #[error("Query error: {0}")]
    Query(SqlxError),

    /// Record not found
    #[error("Record not found")]
    NotFound(String),

    /// Duplicate record
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// Constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => AppError::NotFound(msg),
            RepositoryError::Query(e) => AppError::Sqlx(e),
            RepositoryError::Duplicate(msg) => AppError::Conflict(format!("Duplicate: {}", msg)),
            RepositoryError::ConstraintViolation(msg) => AppError::validation("input", msg),
        }
    }
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match &err {
            SqlxError::RowNotFound => RepositoryError::NotFound("Record not found".to_string()),
            SqlxError::Database(db_err) => {
                if db_err.is_unique_violation() {
                    RepositoryError::Duplicate(db_err.message().to_string())
                } else if db_err.is_foreign_key_violation() || db_err.is_check_violation() {
                    RepositoryError::ConstraintViolation(db_err.message().to_string())
                } else {
                    RepositoryError::Query(err)
                }
            }
            _ => RepositoryError::Query(err),
        }
    }
}
