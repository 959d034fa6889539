//! Environment-based application configuration.
//!
//! Secrets (JWT signing key, Google OAuth credentials) have no defaults:
//! a missing value is a startup-fatal misconfiguration.

use anyhow::{Context, Result};

/// Google OAuth2 client credentials.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

/// Top-level server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// JWT signing secret. Required, no default.
    pub jwt_secret: String,
    /// Session token lifetime in seconds.
    pub token_ttl_secs: u64,
    /// bcrypt cost factor for password hashing.
    pub bcrypt_cost: u32,
    pub google: GoogleConfig,
}

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;
pub const DEFAULT_BCRYPT_COST: u32 = 10;

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Fails if any required secret is absent or empty.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(DEFAULT_PORT),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://./users.db".to_string()),
            jwt_secret: required_var("JWT_SECRET")?,
            token_ttl_secs: parse_var("TOKEN_TTL_SECS").unwrap_or(DEFAULT_TOKEN_TTL_SECS),
            bcrypt_cost: parse_var("BCRYPT_COST").unwrap_or(DEFAULT_BCRYPT_COST),
            google: GoogleConfig {
                client_id: required_var("GOOGLE_CLIENT_ID")?,
                client_secret: required_var("GOOGLE_CLIENT_SECRET")?,
                redirect_url: required_var("GOOGLE_REDIRECT_URL")?,
            },
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    let value = std::env::var(name).with_context(|| format!("{name} must be set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("{name} must not be empty");
    }
    Ok(value)
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}
