//! User store trait.

use async_trait::async_trait;

use crate::auth::errors::AuthError;
use crate::auth::types::{Provenance, User};

/// Persistent user records, keyed by (email, provenance).
///
/// Users are never updated or deleted.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `AuthError::Conflict` when a user with
    /// the same email and provenance already exists; the check and the write
    /// are atomic so concurrent duplicate inserts cannot both succeed.
    async fn insert(&self, user: &User) -> Result<(), AuthError>;

    /// Look up a user by email under one provenance.
    async fn find_by_email(
        &self,
        email: &str,
        provenance: Provenance,
    ) -> Result<Option<User>, AuthError>;
}
