//! Core capabilities: token issuance and password hashing.

pub mod password_service;
pub mod token_service;

pub use password_service::PasswordService;
pub use token_service::{Claims, TokenService};
