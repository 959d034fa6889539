//! Google OAuth2 identity provider.
//!
//! Authorization-code flow: POST the code to the token endpoint, then fetch
//! the user's profile from the userinfo endpoint with the access token.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::auth::errors::AuthError;
use crate::auth::types::FederatedIdentity;
use crate::config::GoogleConfig;

use super::r#trait::IdentityProvider;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

const SCOPES: &str = "https://www.googleapis.com/auth/userinfo.profile \
                      https://www.googleapis.com/auth/userinfo.email";

pub struct GoogleProvider {
    config: GoogleConfig,
    auth_endpoint: String,
    token_endpoint: String,
    userinfo_endpoint: String,
    http: reqwest::Client,
}

impl GoogleProvider {
    pub fn new(config: GoogleConfig) -> Self {
        Self {
            config,
            auth_endpoint: AUTH_ENDPOINT.to_string(),
            token_endpoint: TOKEN_ENDPOINT.to_string(),
            userinfo_endpoint: USERINFO_ENDPOINT.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Point the provider at non-default endpoints. Used by tests to talk to
    /// a mock server.
    pub fn with_endpoints(
        config: GoogleConfig,
        auth_endpoint: impl Into<String>,
        token_endpoint: impl Into<String>,
        userinfo_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            config,
            auth_endpoint: auth_endpoint.into(),
            token_endpoint: token_endpoint.into(),
            userinfo_endpoint: userinfo_endpoint.into(),
            http: reqwest::Client::new(),
        }
    }

    async fn fetch_access_token(&self, code: &str) -> Result<String, AuthError> {
        let response = self
            .http
            .post(&self.token_endpoint)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::ExternalAuth(format!("token endpoint unreachable: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%status, "authorization code exchange rejected");
            return Err(AuthError::ExternalAuth(format!(
                "token endpoint returned {status}"
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AuthError::ExternalAuth(format!("token response unreadable: {e}")))?;

        body["access_token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AuthError::ExternalAuth("token response missing access_token".into()))
    }

    async fn fetch_identity(&self, access_token: &str) -> Result<FederatedIdentity, AuthError> {
        let response = self
            .http
            .get(&self.userinfo_endpoint)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::ExternalAuth(format!("userinfo endpoint unreachable: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AuthError::ExternalAuth(format!(
                "userinfo endpoint returned {status}"
            )));
        }

        let info: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AuthError::ExternalAuth(format!("userinfo response unreadable: {e}")))?;

        let external_id = info["id"]
            .as_str()
            .map(str::to_string)
            .or_else(|| info["id"].as_i64().map(|id| id.to_string()))
            .ok_or_else(|| AuthError::ExternalAuth("identity has no id".into()))?;
        let email = info["email"]
            .as_str()
            .ok_or_else(|| AuthError::ExternalAuth("identity has no email".into()))?
            .to_string();
        let name = info["name"].as_str().unwrap_or("").to_string();
        let avatar = info["picture"].as_str().map(str::to_string);

        Ok(FederatedIdentity {
            external_id,
            email,
            name,
            avatar,
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    fn authorization_url(&self) -> Result<String, AuthError> {
        let url = reqwest::Url::parse_with_params(
            &self.auth_endpoint,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("access_type", "offline"),
            ],
        )
        .map_err(|e| AuthError::Internal(format!("bad authorization endpoint: {e}")))?;

        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str) -> Result<FederatedIdentity, AuthError> {
        let access_token = self.fetch_access_token(code).await?;
        let identity = self.fetch_identity(&access_token).await?;
        debug!(provider = self.name(), email = %identity.email, "code exchange succeeded");
        Ok(identity)
    }
}
