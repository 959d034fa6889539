//! Server entry point: CLI parsing, logging setup, configuration load,
//! wiring of the auth service, and the listener loop.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use auth_service::auth::core::{PasswordService, TokenService};
use auth_service::auth::providers::GoogleProvider;
use auth_service::auth::storage::SqliteStore;
use auth_service::auth::{create_router, AuthService};
use auth_service::config::AppConfig;

#[derive(Parser)]
#[command(name = "auth-service")]
#[command(about = "Email/password and Google OAuth2 authentication service")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Port to bind; overrides the PORT environment variable.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Missing secrets are startup-fatal, before any socket is bound.
    let mut config = AppConfig::from_env().context("configuration error")?;
    if let Some(port) = args.port {
        config.port = port;
    }

    info!("Starting auth-service v{}", env!("CARGO_PKG_VERSION"));

    let store = SqliteStore::connect(&config.database_url)
        .await
        .map_err(|e| anyhow::anyhow!("storage init failed: {e}"))?;
    let provider = GoogleProvider::new(config.google.clone());
    let tokens = TokenService::new(config.jwt_secret.clone(), config.token_ttl_secs)
        .map_err(|e| anyhow::anyhow!("token service init failed: {e}"))?;
    let passwords = PasswordService::new(config.bcrypt_cost);

    let service = Arc::new(AuthService::new(
        Arc::new(store),
        Arc::new(provider),
        tokens,
        passwords,
    ));
    let app = create_router(service);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on {addr}");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
