//! Authentication error taxonomy.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Request-scoped authentication failures.
///
/// All variants are terminal business outcomes, not transient faults;
/// nothing here is retried.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed, missing, or out-of-policy input fields.
    #[error("{0}")]
    InvalidInput(String),

    /// An identity already exists under this or the other provenance.
    #[error("{0}")]
    Conflict(String),

    /// No matching account.
    #[error("{0}")]
    NotFound(String),

    /// Credential mismatch.
    #[error("{0}")]
    Unauthorized(String),

    /// The identity-provider exchange failed.
    #[error("identity provider exchange failed: {0}")]
    ExternalAuth(String),

    /// Unexpected persistence or signing failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::ExternalAuth(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message surfaced to the client. Internal failure details stay in the
    /// logs; the envelope carries a generic message instead.
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => "Unexpected internal error".to_string(),
            Self::ExternalAuth(_) => "Federated login failed, please try again".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "status": "Error",
            "message": self.public_message(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AuthError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AuthError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::ExternalAuth("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AuthError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_not_leaked() {
        let err = AuthError::Internal("db path /var/lib/users.db is corrupt".into());
        assert!(!err.public_message().contains("/var/lib"));

        let err = AuthError::ExternalAuth("token endpoint returned 500".into());
        assert!(!err.public_message().contains("500"));
    }
}
