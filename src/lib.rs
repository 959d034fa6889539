// src/lib.rs

pub mod auth;
pub mod config;

pub use auth::errors::AuthError;
pub use auth::service::AuthService;
pub use config::AppConfig;
