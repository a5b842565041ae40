//! Credential signing service.
//!
//! [`TokenSigner`] is the capability the rest of the crate needs from a
//! token format: mint a self-expiring token for a subject, and recover the
//! subject from a token. [`JwtSigner`] implements it with HS256 compact JWTs.
//!
//! [`CredentialIssuer`] binds a signer to the two kind-specific secrets, so
//! callers name a [`CredentialKind`] instead of passing secret material
//! around.

use super::{
    errors::TokenError,
    models::{CredentialClaims, CredentialKind, CredentialPair, SubjectId},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::sync::Arc;

/// Sign and verify self-expiring credentials
pub trait TokenSigner: Send + Sync {
    /// Mint a token for `subject` that expires after `lifetime`
    fn sign(&self, subject: &str, secret: &str, lifetime: Duration) -> Result<String, TokenError>;

    /// Verify signature and expiry, returning the embedded subject
    fn verify(&self, token: &str, secret: &str) -> Result<SubjectId, TokenError>;
}

/// HS256 JWT signer
#[derive(Debug, Clone, Default)]
pub struct JwtSigner;

impl JwtSigner {
    pub fn new() -> Self {
        Self
    }

    /// Decode and validate a token, returning all of its claims
    ///
    /// Expiry is checked with zero leeway.
    pub fn claims(&self, token: &str, secret: &str) -> Result<CredentialClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = decode::<CredentialClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )?;

        Ok(token_data.claims)
    }
}

impl TokenSigner for JwtSigner {
    fn sign(&self, subject: &str, secret: &str, lifetime: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(lifetime)
            .ok_or_else(|| TokenError::Signing(format!("lifetime {lifetime} out of range")))?;
        let claims = CredentialClaims {
            user_id: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn verify(&self, token: &str, secret: &str) -> Result<SubjectId, TokenError> {
        let claims = self.claims(token, secret)?;
        if claims.user_id.is_empty() {
            return Err(TokenError::Malformed);
        }
        Ok(claims.user_id)
    }
}

/// Issues and verifies credential pairs with kind-specific secrets
#[derive(Clone)]
pub struct CredentialIssuer {
    signer: Arc<dyn TokenSigner>,
    access_secret: String,
    renewal_secret: String,
    access_lifetime: Duration,
    renewal_lifetime: Duration,
}

impl CredentialIssuer {
    /// Create an issuer with the default lifetimes (10 minutes / 1 day)
    ///
    /// # Arguments
    ///
    /// * `signer` - Token format implementation
    /// * `access_secret` - Secret for access credentials
    /// * `renewal_secret` - Secret for renewal credentials
    pub fn new(
        signer: Arc<dyn TokenSigner>,
        access_secret: impl Into<String>,
        renewal_secret: impl Into<String>,
    ) -> Self {
        Self {
            signer,
            access_secret: access_secret.into(),
            renewal_secret: renewal_secret.into(),
            access_lifetime: CredentialKind::Access.default_lifetime(),
            renewal_lifetime: CredentialKind::Renewal.default_lifetime(),
        }
    }

    /// Override both lifetimes
    pub fn with_lifetimes(mut self, access: Duration, renewal: Duration) -> Self {
        self.access_lifetime = access;
        self.renewal_lifetime = renewal;
        self
    }

    /// Lifetime of newly minted credentials of `kind`
    pub fn lifetime(&self, kind: CredentialKind) -> Duration {
        match kind {
            CredentialKind::Access => self.access_lifetime,
            CredentialKind::Renewal => self.renewal_lifetime,
        }
    }

    fn secret(&self, kind: CredentialKind) -> &str {
        match kind {
            CredentialKind::Access => &self.access_secret,
            CredentialKind::Renewal => &self.renewal_secret,
        }
    }

    /// Mint a single credential of `kind` for `subject`
    pub fn sign(&self, kind: CredentialKind, subject: &str) -> Result<String, TokenError> {
        self.signer.sign(subject, self.secret(kind), self.lifetime(kind))
    }

    /// Verify a credential of `kind`, returning its subject
    pub fn verify(&self, kind: CredentialKind, token: &str) -> Result<SubjectId, TokenError> {
        self.signer.verify(token, self.secret(kind))
    }

    /// Mint a fresh access/renewal pair for `subject`
    pub fn issue(&self, subject: &str) -> Result<CredentialPair, TokenError> {
        Ok(CredentialPair {
            access_token: self.sign(CredentialKind::Access, subject)?,
            refresh_token: self.sign(CredentialKind::Renewal, subject)?,
        })
    }
}

impl std::fmt::Debug for CredentialIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialIssuer")
            .field("access_lifetime", &self.access_lifetime)
            .field("renewal_lifetime", &self.renewal_lifetime)
            .finish_non_exhaustive()
    }
}
