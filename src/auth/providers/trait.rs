//! Identity provider trait.

use async_trait::async_trait;

use crate::auth::errors::AuthError;
use crate::auth::types::FederatedIdentity;

/// A federated identity provider, injected into the auth service so tests
/// can substitute a double.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Build the authorization URL a browser should be sent to. Requests
    /// profile and email read scopes with offline access.
    fn authorization_url(&self) -> Result<String, AuthError>;

    /// Exchange a one-time authorization code for a verified identity.
    /// Any provider-side rejection surfaces as `AuthError::ExternalAuth`.
    async fn exchange_code(&self, code: &str) -> Result<FederatedIdentity, AuthError>;
}
