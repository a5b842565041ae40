//! Authentication error types.

use thiserror::Error;

/// Credential signing and verification errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Token expiry timestamp is in the past
    #[error("Token expired")]
    Expired,

    /// Signature does not match the secret
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token could not be parsed
    #[error("Malformed token")]
    Malformed,

    /// Signing backend failed to produce a token
    #[error("Token signing failed: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        }
    }
}

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Password hashing failed
    #[error("Password hashing failed")]
    HashingFailed,

    /// Password verification failed
    #[error("Invalid credentials")]
    InvalidPassword,

    /// No account for the given email
    #[error("Email not found")]
    UserNotFound,

    /// Email already exists
    #[error("Email already exists")]
    EmailTaken,

    /// Invalid display name
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Invalid email format
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password too weak
    #[error("Password too weak: {0}")]
    WeakPassword(String),

    /// Credential error
    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl AuthError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Hashing and token errors are sanitized so that the response never
    /// describes the signing backend or the token structure.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::HashingFailed => "Internal server error".to_string(),
            AuthError::Token(_) => "Authentication failed".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
