//! Password hashing and policy checks.

use crate::auth::errors::AuthError;
use crate::config::DEFAULT_BCRYPT_COST;

/// Minimum password length is strictly greater than this.
const MIN_PASSWORD_LEN_EXCLUSIVE: usize = 8;

/// One-way password hashing via bcrypt.
pub struct PasswordService {
    cost: u32,
}

impl PasswordService {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Reject passwords of 8 characters or fewer.
    pub fn validate_policy(&self, password: &str) -> Result<(), AuthError> {
        if password.chars().count() <= MIN_PASSWORD_LEN_EXCLUSIVE {
            return Err(AuthError::InvalidInput(
                "Password should be more than 8 characters".to_string(),
            ));
        }
        Ok(())
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))
    }

    /// bcrypt's comparison is constant-time on the digest.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        bcrypt::verify(password, hash)
            .map_err(|e| AuthError::Internal(format!("password verification failed: {e}")))
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the test suite fast.
    fn fast_service() -> PasswordService {
        PasswordService::new(4)
    }

    #[test]
    fn test_policy_boundary() {
        let service = fast_service();
        assert!(service.validate_policy("12345678").is_err());
        assert!(service.validate_policy("").is_err());
        assert!(service.validate_policy("123456789").is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let service = fast_service();
        let hash = service.hash("correct horse battery").unwrap();

        assert!(service.verify("correct horse battery", &hash).unwrap());
        assert!(!service.verify("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_verify_malformed_hash_is_internal_error() {
        let service = fast_service();
        assert!(service.verify("whatever", "not-a-bcrypt-hash").is_err());
    }
}
