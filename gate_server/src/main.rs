//! Authentication gateway server.
//!
//! Issues credential pairs on login and guards protected routes with the
//! dual-token check from `token_gate`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use chrono::Duration;
use gate_server::{
    api::{self, AppState},
    config::ServerConfig,
    logging, metrics,
};
use pico_args::Arguments;
use token_gate::auth::{
    AuthManager, CredentialIssuer, InMemoryUserRepository, JwtSigner, TokenGuard,
};
use tracing::info;

const HELP: &str = "\
Run the authentication gateway

USAGE:
  gate_server [OPTIONS]

OPTIONS:
  --bind          IP:PORT  Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8000]
  --metrics-bind  IP:PORT  Prometheus exporter address  [default: env METRICS_BIND, off when unset]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8000)
  JWT_SECRET_KEY           Access credential signing secret (required)
  JWT_REFRESH_SECRET_KEY   Renewal credential signing secret (required)
  PASSWORD_PEPPER          Password hashing pepper (required)
  ACCESS_TOKEN_TTL_SECS    Access credential lifetime [default: 600]
  REFRESH_TOKEN_TTL_SECS   Renewal credential lifetime [default: 86400]
  COOKIE_SECURE            Mark credential cookies Secure [default: false]
  (See .env file for all configuration options)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;
    let metrics_bind: Option<SocketAddr> = pargs.opt_value_from_str("--metrics-bind")?;

    logging::init();

    let config = ServerConfig::from_env(bind, metrics_bind)?;
    info!("Starting authentication gateway at {}", config.bind);

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus metrics exported at http://{}/metrics", addr);
    }

    let issuer = Arc::new(
        CredentialIssuer::new(
            Arc::new(JwtSigner::new()),
            config.security.access_secret.clone(),
            config.security.refresh_secret.clone(),
        )
        .with_lifetimes(
            Duration::seconds(config.tokens.access_ttl_secs),
            Duration::seconds(config.tokens.refresh_ttl_secs),
        ),
    );

    let auth_manager = Arc::new(AuthManager::new(
        Arc::new(InMemoryUserRepository::new()),
        issuer.clone(),
        config.security.password_pepper.clone(),
    ));

    let state = AppState {
        auth_manager,
        guard: Arc::new(TokenGuard::new(issuer)),
        secure_cookies: config.tokens.secure_cookies,
    };

    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C signal handler: {e}");
        std::future::pending::<()>().await;
    }
}
