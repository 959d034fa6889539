//! Request handlers and the input guard.
//!
//! Success responses use the `{status, message, ...}` envelope; errors are
//! rendered by `AuthError::into_response`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Json, Query, State};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::errors::AuthError;
use crate::auth::service::AuthService;
use crate::auth::types::{LoginRequest, RegisterRequest};

/// Reject requests with missing or whitespace-only required fields before
/// they reach the service. Reports every offending field at once.
fn require_fields(fields: &[(&str, &str, &str)]) -> Result<(), AuthError> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, value, _)| value.trim().is_empty())
        .map(|(field, _, message)| format!("{field}: {message}"))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AuthError::InvalidInput(missing.join(", ")))
    }
}

/// GET /auth/google
pub async fn google_auth_url(
    State(service): State<Arc<AuthService>>,
) -> Result<Json<Value>, AuthError> {
    let url = service.authorization_url()?;
    Ok(Json(json!({
        "status": "Success",
        "message": "Google auth URL successfully created",
        "data": { "url": url },
    })))
}

/// GET /auth/google/callback?code=...
pub async fn google_callback(
    State(service): State<Arc<AuthService>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, AuthError> {
    let code = params.get("code").map(String::as_str).unwrap_or_default();
    require_fields(&[("code", code, "Authorization code is required")])?;

    let token = service.federated_login(code).await?;
    Ok(Json(json!({
        "status": "Success",
        "message": "Successfully logged in",
        "token": token,
    })))
}

/// POST /auth/register
pub async fn register(
    State(service): State<Arc<AuthService>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Value>, AuthError> {
    let request_at = chrono::Utc::now();
    info!(email = %req.email, "registration request");

    require_fields(&[
        ("email", &req.email, "Email is required"),
        ("name", &req.name, "Name is required"),
        ("password", &req.password, "Password is required"),
        (
            "confirmPassword",
            &req.confirm_password,
            "Password confirmation is required",
        ),
    ])?;

    service.register(req).await?;
    Ok(Json(json!({
        "status": "Success",
        "message": "User successfully registered",
        "requestAt": request_at.to_rfc3339(),
    })))
}

/// POST /auth/login
pub async fn login(
    State(service): State<Arc<AuthService>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, AuthError> {
    info!(email = %req.email, "login request");

    require_fields(&[
        ("email", &req.email, "Email is required"),
        ("password", &req.password, "Password is required"),
    ])?;

    let token = service.login(req).await?;
    Ok(Json(json!({
        "status": "Success",
        "message": "Successfully logged in",
        "data": token,
    })))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_fields_reports_all_missing() {
        let err = require_fields(&[
            ("email", "", "Email is required"),
            ("name", "Alice", "Name is required"),
            ("password", "   ", "Password is required"),
        ])
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("email: Email is required"));
        assert!(message.contains("password: Password is required"));
        assert!(!message.contains("name:"));
    }

    #[test]
    fn test_require_fields_passes_when_present() {
        assert!(require_fields(&[("email", "a@b.c", "Email is required")]).is_ok());
    }
}
