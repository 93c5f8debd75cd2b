use crate::auth::{PasswordHasher, RequestContext};
use crate::error::{AppError, AppResult, Credential, RepositoryError, ValidationErrors};
use crate::models::{AccountType, User};
use crate::repositories::UserRepository;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError};

const MAX_NAME_CHARS: usize = 100;
const MIN_PASSWORD_CHARS: usize = 8;

pub const DUPLICATE_EMAIL_MESSAGE: &str = "Email already exists. Please use another email.";

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        Err(invalid("required", "Name is required."))
    } else if name.chars().count() > MAX_NAME_CHARS {
        Err(invalid("length", "Name must be less than 100 characters."))
    } else {
        Ok(())
    }
}

fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        Err(invalid("required", "Email is required."))
    } else if !email.validate_email() {
        Err(invalid("email", "Invalid email format."))
    } else {
        Ok(())
    }
}

fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(invalid("required", "Password is required."));
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(invalid("length", "Password must be at least 8 characters long."));
    }
    let upper = password.chars().any(|c| c.is_ascii_uppercase());
    let lower = password.chars().any(|c| c.is_ascii_lowercase());
    let digit = password.chars().any(|c| c.is_ascii_digit());
    if !(upper && lower && digit) {
        return Err(invalid(
            "strength",
            "Password must contain at least one uppercase letter, one lowercase letter, and one number.",
        ));
    }
    Ok(())
}

/// Registration form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_email_address"))]
    pub email: String,
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub account_type: String,
}

const REGISTER_FIELDS: &[&str] = &["name", "email", "password"];

impl RegisterRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
        account_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
            account_type: account_type.into(),
        }
    }

    /// Trim name and email, then collect every violation in form order
    fn normalized(&self) -> AppResult<Self> {
        let request = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
            account_type: self.account_type.clone(),
        };

        let mut errors = match request.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => ValidationErrors::from_validator(&e, REGISTER_FIELDS),
        };
        if request.password != request.confirm_password {
            errors.push("confirm_password", "Passwords do not match.");
        }
        errors.into_result()?;

        Ok(request)
    }
}

/// Service for accounts and credential checks
pub struct AccountService {
    user_repo: Arc<UserRepository>,
    hasher: Arc<PasswordHasher>,
}

impl AccountService {
    pub fn new(user_repo: Arc<UserRepository>, hasher: Arc<PasswordHasher>) -> Self {
        Self { user_repo, hasher }
    }

    /// Create an account
    pub async fn register(&self, request: &RegisterRequest) -> AppResult<User> {
        let request = request.normalized()?;

        if self.user_repo.email_exists(&request.email).await? {
            return Err(AppError::validation("email", DUPLICATE_EMAIL_MESSAGE));
        }

        let account_type = AccountType::parse_or_default(&request.account_type);
        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::new(request.name, request.email, password_hash, account_type);

        // The unique index still decides if two registrations race
        match self.user_repo.create(&user).await.map_err(RepositoryError::from) {
            Ok(()) => {}
            Err(RepositoryError::Duplicate(_)) => {
                return Err(AppError::validation("email", DUPLICATE_EMAIL_MESSAGE));
            }
            Err(e) => return Err(e.into()),
        }

        info!("Registered user {} ({})", user.id, user.account_type);
        Ok(user)
    }

    /// Check an email and password pair and open a request context
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<RequestContext> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::validation("credentials", "Both fields are required."));
        }

        let user = match self.user_repo.find_by_email(email).await? {
            Some(user) => user,
            None => {
                warn!("Login attempt for unknown email");
                return Err(AppError::InvalidCredentials(Credential::Account));
            }
        };

        self.hasher
            .require(password, &user.password_hash, Credential::Account)
            .map_err(|e| {
                if let AppError::InvalidCredentials(_) = e {
                    warn!("Wrong password for user {}", user.id);
                }
                e
            })?;

        debug!("Authenticated user {}", user.id);
        Ok(RequestContext::new(user.id))
    }

    /// Look up a user by id
    pub async fn find_user(&self, id: Uuid) -> AppResult<User> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(request: RegisterRequest) -> Vec<String> {
        match request.normalized() {
            Err(AppError::Validation(errors)) => {
                errors.messages().into_iter().map(String::from).collect()
            }
            other => panic!("expected validation error, got {:?}", other.map(|r| r.email)),
        }
    }

    #[test]
    fn test_valid_request_is_trimmed() {
        let request = RegisterRequest::new(" Ana ", " ana@example.com ", "Secret123", "Secret123", "Family");
        let normalized = request.normalized().unwrap();

        assert_eq!(normalized.name, "Ana");
        assert_eq!(normalized.email, "ana@example.com");
    }

    #[test]
    fn test_all_violations_are_reported() {
        let got = messages(RegisterRequest::new("", "not-an-email", "short", "other", ""));

        assert_eq!(
            got,
            vec![
                "Name is required.",
                "Invalid email format.",
                "Password must be at least 8 characters long.",
                "Passwords do not match.",
            ]
        );
    }

    #[test]
    fn test_password_needs_mixed_characters() {
        let got = messages(RegisterRequest::new("Ana", "ana@example.com", "alllowercase1", "alllowercase1", ""));
        assert_eq!(
            got,
            vec!["Password must contain at least one uppercase letter, one lowercase letter, and one number."]
        );
    }

    #[test]
    fn test_long_name_and_blank_email() {
        let name = "x".repeat(101);
        let got = messages(RegisterRequest::new(name, "   ", "Secret123", "Secret123", ""));
        assert_eq!(got, vec!["Name must be less than 100 characters.", "Email is required."]);
    }
}
