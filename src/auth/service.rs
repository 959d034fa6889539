//! Authentication decision logic.
//!
//! Reconciles two identity provenances (locally-registered credentials vs.
//! federated identity) against one user record space. The invariant: once an
//! email exists under one provenance, both registration and login under the
//! other provenance are conflicts. The opposite-provenance check always runs
//! before the same-provenance lookup, so a federated identity can never be
//! silently logged into a local account or vice versa.

use std::sync::Arc;

use tracing::info;

use crate::auth::core::{PasswordService, TokenService};
use crate::auth::errors::AuthError;
use crate::auth::providers::IdentityProvider;
use crate::auth::storage::UserStore;
use crate::auth::types::{
    Credential, FederatedIdentity, LoginRequest, Provenance, RegisterRequest, User, DEFAULT_AVATAR,
};

const REGISTERED_VIA_OTHER_METHOD: &str = "User is already registered via another method";

pub struct AuthService {
    store: Arc<dyn UserStore>,
    provider: Arc<dyn IdentityProvider>,
    tokens: TokenService,
    passwords: PasswordService,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserStore>,
        provider: Arc<dyn IdentityProvider>,
        tokens: TokenService,
        passwords: PasswordService,
    ) -> Self {
        Self {
            store,
            provider,
            tokens,
            passwords,
        }
    }

    /// Reject the attempt when the email already exists under the other
    /// provenance. Runs before any same-provenance lookup so a federated
    /// identity can never reach a local account or vice versa.
    async fn ensure_no_opposite(
        &self,
        email: &str,
        provenance: Provenance,
    ) -> Result<(), AuthError> {
        if self
            .store
            .find_by_email(email, provenance.opposite())
            .await?
            .is_some()
        {
            return Err(AuthError::Conflict(REGISTERED_VIA_OTHER_METHOD.to_string()));
        }
        Ok(())
    }

    /// Register a local-provenance user. Success is an acknowledgment only;
    /// registration does not log the user in.
    pub async fn register(&self, req: RegisterRequest) -> Result<(), AuthError> {
        self.ensure_no_opposite(&req.email, Provenance::Local).await?;

        if self
            .store
            .find_by_email(&req.email, Provenance::Local)
            .await?
            .is_some()
        {
            return Err(AuthError::Conflict("Email is already registered".to_string()));
        }

        self.passwords.validate_policy(&req.password)?;

        if req.password != req.confirm_password {
            return Err(AuthError::InvalidInput(
                "Password and password confirmation do not match".to_string(),
            ));
        }

        let password_hash = self.passwords.hash(&req.password)?;
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: req.email,
            name: req.name,
            avatar: DEFAULT_AVATAR.to_string(),
            created_at: chrono::Utc::now(),
            credential: Credential::Local { password_hash },
        };

        // The store's unique constraint closes the race with a concurrent
        // register for the same email.
        self.store.insert(&user).await?;
        info!(user_id = %user.id, "local user registered");
        Ok(())
    }

    /// Authenticate a local user, returning a signed session token.
    pub async fn login(&self, req: LoginRequest) -> Result<String, AuthError> {
        self.ensure_no_opposite(&req.email, Provenance::Local).await?;

        let user = self
            .store
            .find_by_email(&req.email, Provenance::Local)
            .await?
            .ok_or_else(|| AuthError::NotFound("Account does not exist".to_string()))?;

        let Credential::Local { ref password_hash } = user.credential else {
            return Err(AuthError::Internal("local user without password hash".into()));
        };

        if !self.passwords.verify(&req.password, password_hash)? {
            return Err(AuthError::Unauthorized("Wrong email or password".to_string()));
        }

        info!(user_id = %user.id, "local login succeeded");
        self.tokens.issue(&user)
    }

    /// Exchange an authorization code for a federated identity and log it in,
    /// creating the user on first sight. Idempotent per external identity.
    pub async fn federated_login(&self, code: &str) -> Result<String, AuthError> {
        let identity = self.provider.exchange_code(code).await?;

        self.ensure_no_opposite(&identity.email, Provenance::Federated)
            .await?;

        if let Some(existing) = self
            .store
            .find_by_email(&identity.email, Provenance::Federated)
            .await?
        {
            info!(user_id = %existing.id, "federated login for existing user");
            return self.tokens.issue(&existing);
        }

        let user = self.create_federated_user(identity).await?;
        info!(user_id = %user.id, "federated user created");
        self.tokens.issue(&user)
    }

    /// The provider authorization URL for starting a federated login.
    pub fn authorization_url(&self) -> Result<String, AuthError> {
        self.provider.authorization_url()
    }

    async fn create_federated_user(&self, identity: FederatedIdentity) -> Result<User, AuthError> {
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: identity.email,
            name: identity.name,
            avatar: identity.avatar.unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            created_at: chrono::Utc::now(),
            credential: Credential::Federated {
                external_id: identity.external_id,
            },
        };

        match self.store.insert(&user).await {
            Ok(()) => Ok(user),
            // Lost a race with a concurrent federated login for the same
            // identity; the winner's record is authoritative.
            Err(AuthError::Conflict(_)) => self
                .store
                .find_by_email(&user.email, Provenance::Federated)
                .await?
                .ok_or_else(|| AuthError::Internal("federated user vanished after conflict".into())),
            Err(e) => Err(AuthError::Internal(format!("user creation failed: {e}"))),
        }
    }
}
