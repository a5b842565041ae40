//! HTTP API for the authentication gateway.
//!
//! # Architecture
//!
//! The API is built with:
//! - **Axum**: Async web framework for HTTP
//! - **Tower**: Middleware for CORS, request IDs and the token guard
//! - **JWT**: Stateless access/refresh credentials carried in cookies
//!
//! # Modules
//!
//! - [`auth`]: Registration, login, logout and the login probe
//! - [`middleware`]: Token guard for protected endpoints
//! - [`cookies`]: Credential cookie parsing and `Set-Cookie` construction
//! - [`request_id`]: Request correlation IDs
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /             - Liveness message (public)
//! GET  /health       - Health status (public)
//! POST /register     - Register and log in (public)
//! POST /login        - Log in (public)
//! POST /logout       - Clear credential cookies (public)
//! GET  /checklogin   - Authenticated subject (token guard)
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use gate_server::api::{AppState, create_router};
//! use std::sync::Arc;
//! use token_gate::auth::{
//!     AuthManager, CredentialIssuer, InMemoryUserRepository, JwtSigner, TokenGuard,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let issuer = Arc::new(CredentialIssuer::new(
//!     Arc::new(JwtSigner::new()),
//!     "access_secret_change_me_0123456789abcdef",
//!     "renewal_secret_change_me_0123456789abcdef",
//! ));
//! let state = AppState {
//!     auth_manager: Arc::new(AuthManager::new(
//!         Arc::new(InMemoryUserRepository::new()),
//!         issuer.clone(),
//!         "pepper_change_me_0123".to_string(),
//!     )),
//!     guard: Arc::new(TokenGuard::new(issuer)),
//!     secure_cookies: false,
//! };
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins; credentialed cookie requests need an explicit origin.

pub mod auth;
pub mod cookies;
pub mod middleware;
pub mod request_id;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use token_gate::auth::{AuthManager, TokenGuard};
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request (cheap due to Arc wrappers).
#[derive(Clone)]
pub struct AppState {
    /// Registration and login
    pub auth_manager: Arc<AuthManager>,
    /// Admission decision for protected routes
    pub guard: Arc<TokenGuard>,
    /// Add the `Secure` attribute to credential cookies
    pub secure_cookies: bool,
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout));

    let protected_routes = Router::new()
        .route("/checklogin", get(auth::check_login))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::token_guard,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> impl IntoResponse {
    Json(json!({ "message": "The API is working" }))
}

/// Health check endpoint for monitoring and load balancers.
///
/// The gateway holds no external connections, so reaching the handler is
/// the health signal.
///
/// ```bash
/// curl http://localhost:8000/health
/// # {"status":"healthy","version":"0.1.0","timestamp":"2026-10-16T10:30:00Z"}
/// ```
async fn health_check() -> impl IntoResponse {
    let response = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(response))
}
