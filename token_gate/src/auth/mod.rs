//! Authentication module: credential signing, the token guard, and accounts.
//!
//! This module implements stateless dual-token authentication:
//! - HS256 access credentials (10-minute expiry)
//! - HS256 renewal credentials (1-day expiry), signed with a separate secret
//! - Silent rotation of both credentials when only the access credential lapsed
//! - Argon2id password hashing with server-side pepper
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use token_gate::auth::{
//!     CredentialIssuer, GuardDecision, JwtSigner, PresentedCredentials, TokenGuard,
//! };
//!
//! let issuer = Arc::new(CredentialIssuer::new(
//!     Arc::new(JwtSigner::new()),
//!     "access_secret_change_me_0123456789abcdef",
//!     "renewal_secret_change_me_0123456789abcdef",
//! ));
//! let pair = issuer.issue("u1").unwrap();
//!
//! let guard = TokenGuard::new(issuer);
//! let decision = guard.check(PresentedCredentials::new(
//!     Some(&pair.access_token),
//!     Some(&pair.refresh_token),
//! ));
//! assert!(matches!(
//!     decision,
//!     GuardDecision::Admit(a) if a.subject == "u1" && a.rotated.is_none()
//! ));
//! ```

pub mod errors;
pub mod guard;
pub mod manager;
pub mod models;
pub mod repository;
pub mod signer;

pub use errors::{AuthError, AuthResult, TokenError};
pub use guard::{Admission, GuardDecision, PresentedCredentials, Rejection, TokenGuard};
pub use manager::AuthManager;
pub use models::{
    ACCESS_TOKEN_LIFETIME_SECS, CredentialClaims, CredentialKind, CredentialPair, LoginRequest,
    REFRESH_TOKEN_LIFETIME_SECS, RegisterRequest, SubjectId, User, UserRecord,
};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use signer::{CredentialIssuer, JwtSigner, TokenSigner};
