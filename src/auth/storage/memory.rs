//! In-memory user store for development and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::auth::errors::AuthError;
use crate::auth::types::{Provenance, User};

use super::r#trait::UserStore;

/// Users keyed by (email, provenance). The uniqueness check and the insert
/// happen under one write lock, mirroring the database unique constraint.
#[derive(Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<(String, Provenance), User>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: &User) -> Result<(), AuthError> {
        let key = (user.email.clone(), user.provenance());
        let mut users = self.users.write().await;
        if users.contains_key(&key) {
            return Err(AuthError::Conflict("Email is already registered".to_string()));
        }
        users.insert(key, user.clone());
        debug!(email = %user.email, provenance = %user.provenance(), "user stored");
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &str,
        provenance: Provenance,
    ) -> Result<Option<User>, AuthError> {
        let users = self.users.read().await;
        Ok(users.get(&(email.to_string(), provenance)).cloned())
    }
}
