//! Federated identity providers.

pub mod google;
pub mod r#trait;

pub use google::GoogleProvider;
pub use r#trait::IdentityProvider;
