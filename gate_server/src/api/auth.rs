//! Account API handlers.
//!
//! This module provides the HTTP endpoints around the token guard:
//! - Registration, which also logs the new user in
//! - Login with email and password
//! - Logout, which clears both credential cookies
//! - A protected probe reporting the authenticated subject
//!
//! Successful registration and login set the `authToken` and `refreshToken`
//! cookies. All responses use the `{ ok, message, data }` envelope.
//!
//! # Examples
//!
//! Register a new user:
//! ```bash
//! curl -i -X POST http://localhost:8000/register \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Ada", "email": "ada@example.com", "password": "SecurePass123"}'
//! ```
//!
//! Login:
//! ```bash
//! curl -i -c cookies.txt -X POST http://localhost:8000/login \
//!   -H "Content-Type: application/json" \
//!   -d '{"email": "ada@example.com", "password": "SecurePass123"}'
//! ```

use axum::{
    Json,
    extract::{Extension, State},
    http::{HeaderMap, StatusCode},
};
use serde::Serialize;
use serde_json::{Value, json};
use token_gate::auth::{AuthError, CredentialPair, LoginRequest, RegisterRequest};

use super::{AppState, cookies, middleware::AuthenticatedUser};
use crate::{logging, metrics};

/// Response envelope shared by the account endpoints
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApiResponse {
    fn success(message: &str, data: Option<Value>) -> Json<Self> {
        Json(Self {
            ok: true,
            message: message.to_string(),
            data,
        })
    }

    fn failure(message: String) -> Json<Self> {
        Json(Self {
            ok: false,
            message,
            data: None,
        })
    }
}

type ApiError = (StatusCode, Json<ApiResponse>);

fn error_response(err: AuthError) -> ApiError {
    let status = match &err {
        AuthError::EmailTaken => StatusCode::CONFLICT,
        AuthError::UserNotFound
        | AuthError::InvalidPassword
        | AuthError::InvalidName(_)
        | AuthError::InvalidEmail(_)
        | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
        AuthError::HashingFailed | AuthError::Token(_) => {
            tracing::error!("Account operation failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, ApiResponse::failure(err.client_message()))
}

fn credential_headers(state: &AppState, pair: &CredentialPair) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    cookies::append_pair(&mut headers, pair, state.secure_cookies).map_err(|e| {
        tracing::error!("Invalid credential cookie: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiResponse::failure("Internal server error".to_string()),
        )
    })?;
    Ok(headers)
}

/// Register a new user account and log it in.
///
/// # Request Body
///
/// ```json
/// { "name": "Ada", "email": "ada@example.com", "password": "SecurePass123" }
/// ```
///
/// # Response
///
/// `201 Created` with both credential cookies set:
/// ```json
/// { "ok": true, "message": "User registered successfully", "data": { "userId": "..." } }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Email already exists
/// - `400 Bad Request`: Invalid name, email, or weak password
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<ApiResponse>), ApiError> {
    let credentials = LoginRequest {
        email: request.email.clone(),
        password: request.password.clone(),
    };

    state
        .auth_manager
        .register(request)
        .await
        .map_err(error_response)?;
    metrics::registrations_total();

    let (user, tokens) = state
        .auth_manager
        .login(credentials)
        .await
        .map_err(error_response)?;

    let headers = credential_headers(&state, &tokens)?;
    Ok((
        StatusCode::CREATED,
        headers,
        ApiResponse::success(
            "User registered successfully",
            Some(json!({ "userId": user.id })),
        ),
    ))
}

/// Authenticate a user and issue a credential pair.
///
/// # Request Body
///
/// ```json
/// { "email": "ada@example.com", "password": "SecurePass123" }
/// ```
///
/// # Response
///
/// `200 OK` with both credential cookies set; the tokens are echoed in `data`:
/// ```json
/// { "ok": true, "message": "Login successful",
///   "data": { "authToken": "eyJ...", "refreshToken": "eyJ..." } }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `Email not found` or `Invalid credentials`
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<ApiResponse>), ApiError> {
    let (user, tokens) = match state.auth_manager.login(request).await {
        Ok(result) => {
            metrics::login_attempts_total(true);
            result
        }
        Err(e) => {
            metrics::login_attempts_total(false);
            logging::log_security_event("login_failed", None, None, &e.to_string());
            return Err(error_response(e));
        }
    };

    tracing::info!(user_id = %user.id, "User logged in");
    let headers = credential_headers(&state, &tokens)?;
    Ok((
        headers,
        ApiResponse::success("Login successful", Some(json!(tokens))),
    ))
}

/// Clear both credential cookies.
///
/// Credentials are stateless, so this only instructs the client to discard
/// them; a copy kept elsewhere stays valid until it expires.
pub async fn logout(State(state): State<AppState>) -> Result<(StatusCode, HeaderMap), ApiError> {
    let mut headers = HeaderMap::new();
    cookies::append_cleared(&mut headers, state.secure_cookies).map_err(|e| {
        tracing::error!("Invalid credential cookie: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiResponse::failure("Internal server error".to_string()),
        )
    })?;
    Ok((StatusCode::NO_CONTENT, headers))
}

/// Report the subject admitted by the token guard.
///
/// Mounted behind [`token_guard`](super::middleware::token_guard).
pub async fn check_login(Extension(user): Extension<AuthenticatedUser>) -> Json<ApiResponse> {
    ApiResponse::success(
        "User authenticated successfully",
        Some(json!({ "userId": user.user_id })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use token_gate::auth::TokenError;

    #[test]
    fn test_error_statuses() {
        assert_eq!(error_response(AuthError::EmailTaken).0, StatusCode::CONFLICT);
        assert_eq!(error_response(AuthError::UserNotFound).0, StatusCode::BAD_REQUEST);
        assert_eq!(error_response(AuthError::InvalidPassword).0, StatusCode::BAD_REQUEST);
        assert_eq!(
            error_response(AuthError::Token(TokenError::Signing("x".to_string()))).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_messages_match_client_message() {
        let (_, Json(body)) = error_response(AuthError::UserNotFound);
        assert!(!body.ok);
        assert_eq!(body.message, "Email not found");

        let (_, Json(body)) = error_response(AuthError::InvalidPassword);
        assert_eq!(body.message, "Invalid credentials");
    }
}
