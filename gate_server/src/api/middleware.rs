//! Token guard middleware for protected endpoints.
//!
//! Reads the `authToken` and `refreshToken` cookies, runs the
//! [`TokenGuard`](token_gate::auth::TokenGuard) decision, and either rejects
//! the request or forwards it with the resolved subject attached. When the
//! guard rotated the credentials, the new pair is written to the response as
//! two `Set-Cookie` headers.
//!
//! # Extracting the subject
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//! use gate_server::api::middleware::AuthenticatedUser;
//!
//! async fn protected_handler(Extension(user): Extension<AuthenticatedUser>) -> String {
//!     format!("Authenticated as user {}", user.user_id)
//! }
//! # let _ = protected_handler;
//! ```

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use token_gate::auth::{
    Admission, CredentialKind, GuardDecision, PresentedCredentials, Rejection, SubjectId,
};

use super::{AppState, cookies, request_id::RequestId};
use crate::{logging, metrics};

/// Subject resolved by the token guard, available to downstream handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: SubjectId,
}

/// Rejection body returned by the guard
#[derive(Debug, Serialize)]
pub struct GuardRejectionBody {
    pub message: &'static str,
}

fn rejection_response(rejection: Rejection) -> Response {
    let status =
        StatusCode::from_u16(rejection.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(GuardRejectionBody {
            message: rejection.message(),
        }),
    )
        .into_response()
}

/// Middleware that admits, rejects, or admits-and-rotates each request
///
/// # Behavior
///
/// - **Either cookie missing**: `403` with `{"message":" Login Failed"}`
/// - **Valid access credential**: subject injected, handler runs, no cookies set
/// - **Invalid access, valid renewal**: subject injected, handler runs, both
///   cookies replaced on the response
/// - **Both invalid**: `402` with `{"message":" Authentication Failed"}`
pub async fn token_guard(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let access = cookies::read_credential(request.headers(), CredentialKind::Access);
    let renewal = cookies::read_credential(request.headers(), CredentialKind::Renewal);

    let decision = state.guard.check(PresentedCredentials::new(
        access.as_deref(),
        renewal.as_deref(),
    ));
    metrics::guard_decisions_total(decision.label());

    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.as_str().to_string());

    let Admission { subject, rotated } = match decision {
        GuardDecision::Admit(admission) => admission,
        GuardDecision::Reject(rejection) => {
            logging::log_security_event(
                rejection.label(),
                request_id.as_deref(),
                None,
                rejection.message().trim(),
            );
            return rejection_response(rejection);
        }
    };

    // Cookies are built before the handler runs; a bad value rejects outright
    let rotated_cookies = match &rotated {
        Some(pair) => match cookies::pair_cookies(pair, state.secure_cookies) {
            Ok(values) => {
                tracing::info!(
                    request_id = request_id.as_deref(),
                    user_id = %subject,
                    "Credentials rotated"
                );
                Some(values)
            }
            Err(e) => {
                tracing::error!(
                    request_id = request_id.as_deref(),
                    "Invalid credential cookie: {e}"
                );
                return rejection_response(Rejection::Internal);
            }
        },
        None => None,
    };

    request
        .extensions_mut()
        .insert(AuthenticatedUser { user_id: subject });

    let mut response = next.run(request).await;
    for cookie in rotated_cookies.into_iter().flatten() {
        response.headers_mut().append(SET_COOKIE, cookie);
    }
    response
}
