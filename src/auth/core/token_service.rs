//! Stateless session token issuance.
//!
//! Tokens are signed (HS256), not encrypted: the claim set {id, name, email}
//! is inspectable and must be treated as non-confidential.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::auth::errors::AuthError;
use crate::auth::types::User;

/// Signed token payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub name: String,
    pub email: String,
    /// Issued-at timestamp.
    pub iat: usize,
    /// Expiry timestamp.
    pub exp: usize,
}

/// Issues signed session tokens from a process-wide secret.
pub struct TokenService {
    secret: Zeroizing<String>,
    ttl_secs: u64,
}

impl TokenService {
    /// # Errors
    /// Rejects secrets shorter than 32 characters.
    pub fn new(secret: String, ttl_secs: u64) -> Result<Self, AuthError> {
        if secret.len() < 32 {
            return Err(AuthError::InvalidInput(
                "JWT secret must be at least 32 characters".to_string(),
            ));
        }
        Ok(Self {
            secret: Zeroizing::new(secret),
            ttl_secs,
        })
    }

    /// Issue a token for an authenticated user.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            iat: now,
            exp: now + self.ttl_secs as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))
    }

    /// Decode and validate a token, returning its claims.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| AuthError::Unauthorized("Invalid token".to_string()))?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::{Credential, DEFAULT_AVATAR};

    const TEST_SECRET: &str = "an_adequately_long_signing_secret_for_tests";

    fn sample_user() -> User {
        User {
            id: "user-123".to_string(),
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
            avatar: DEFAULT_AVATAR.to_string(),
            created_at: chrono::Utc::now(),
            credential: Credential::Federated {
                external_id: "g-1".to_string(),
            },
        }
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(TokenService::new("short".to_string(), 3600).is_err());
    }

    #[test]
    fn test_issue_and_decode() {
        let service = TokenService::new(TEST_SECRET.to_string(), 3600).unwrap();
        let token = service.issue(&sample_user()).unwrap();

        let claims = service.decode(&token).unwrap();
        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.name, "Test User");
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = TokenService::new(TEST_SECRET.to_string(), 3600).unwrap();
        assert!(service.decode("not-a-token").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenService::new(TEST_SECRET.to_string(), 3600).unwrap();
        let other =
            TokenService::new("a_different_but_equally_long_secret_value".to_string(), 3600)
                .unwrap();

        let token = issuer.issue(&sample_user()).unwrap();
        assert!(other.decode(&token).is_err());
    }
}
