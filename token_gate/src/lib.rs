//! # Token Gate
//!
//! Stateless dual-token authentication: short-lived access credentials backed
//! by a longer-lived renewal credential, with silent rotation.
//!
//! The central piece is [`auth::TokenGuard`], which decides for every request
//! whether to admit it, reject it, or admit it while handing back a freshly
//! minted credential pair. Transport concerns (cookies, HTTP status codes on
//! the wire) are left to the server crate.
//!
//! ## Core Modules
//!
//! - [`auth`]: Credential signing, the token guard, and account management

/// Credential signing, admission decisions, and account management.
pub mod auth;
pub use auth::{AuthManager, CredentialIssuer, GuardDecision, JwtSigner, TokenGuard};
