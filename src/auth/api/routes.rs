//! Route table.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::service::AuthService;

use super::handlers;

pub fn create_router(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/auth/google", get(handlers::google_auth_url))
        .route("/auth/google/callback", get(handlers::google_callback))
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}
