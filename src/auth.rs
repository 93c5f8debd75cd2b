use crate::config::PasswordConfig;
use crate::error::{AppError, AppResult, Credential};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use uuid::Uuid;

/// Identity of the caller for the duration of one request.
///
/// Produced by `AccountService::authenticate` and passed explicitly into
/// every service operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: Uuid,
}

impl RequestContext {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Salted one-way hashing for account and group passwords (Argon2id)
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Build a hasher with the configured cost parameters
    pub fn new(config: &PasswordConfig) -> AppResult<Self> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| AppError::Config(format!("invalid password parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash `password` with a fresh random salt, returning a PHC string
    pub fn hash(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::PasswordHash(e.to_string()))
    }

    /// Check `password` against a stored PHC string.
    ///
    /// Returns `Ok(false)` on mismatch; a malformed stored hash is an error.
    /// The comparison itself is constant-time inside `argon2`.
    pub fn verify(&self, password: &str, stored_hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| AppError::PasswordHash(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::PasswordHash(e.to_string())),
        }
    }

    /// Verify, turning a mismatch into `AppError::InvalidCredentials`
    pub fn require(&self, password: &str, stored_hash: &str, credential: Credential) -> AppResult<()> {
        if self.verify(password, stored_hash)? {
            Ok(())
        } else {
            Err(AppError::InvalidCredentials(credential))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(&PasswordConfig::fast_insecure()).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash("abc123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("abc123", &hash).unwrap());
        assert!(!hasher.verify("wrong", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = hasher();
        let first = hasher.hash("same password").unwrap();
        let second = hasher.hash("same password").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_require_maps_mismatch_to_invalid_credentials() {
        let hasher = hasher();
        let hash = hasher.hash("abc123").unwrap();

        assert!(hasher.require("abc123", &hash, Credential::Group).is_ok());
        assert!(matches!(
            hasher.require("abc124", &hash, Credential::Group),
            Err(AppError::InvalidCredentials(Credential::Group))
        ));
        assert!(matches!(
            hasher.require("", &hash, Credential::Account),
            Err(AppError::InvalidCredentials(Credential::Account))
        ));
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let result = hasher().verify("anything", "not-a-phc-string");
        assert!(matches!(result, Err(AppError::PasswordHash(_))));
    }
}
