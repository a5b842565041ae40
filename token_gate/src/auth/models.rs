//! Authentication data models.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Subject identifier embedded in every credential
pub type SubjectId = String;

/// Default access credential lifetime
pub const ACCESS_TOKEN_LIFETIME_SECS: i64 = 10 * 60;

/// Default renewal credential lifetime
pub const REFRESH_TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// The two credential kinds, distinguished by secret and lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    /// Short-lived credential presented on every request
    Access,
    /// Long-lived credential used only to mint a fresh pair
    Renewal,
}

impl CredentialKind {
    /// Transport slot name (cookie name) for this kind
    pub fn slot_name(self) -> &'static str {
        match self {
            CredentialKind::Access => "authToken",
            CredentialKind::Renewal => "refreshToken",
        }
    }

    /// Lifetime used when no override is configured
    pub fn default_lifetime(self) -> Duration {
        match self {
            CredentialKind::Access => Duration::seconds(ACCESS_TOKEN_LIFETIME_SECS),
            CredentialKind::Renewal => Duration::seconds(REFRESH_TOKEN_LIFETIME_SECS),
        }
    }
}

/// JWT claims carried by both credential kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialClaims {
    #[serde(rename = "userId")]
    pub user_id: SubjectId,
    pub iat: i64, // Issued at timestamp
    pub exp: i64, // Expiration timestamp
}

/// A freshly minted access/renewal pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    #[serde(rename = "authToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// User model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: SubjectId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Stored user with its password hash
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

/// User registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// User login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
