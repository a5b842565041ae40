//! Dual-token admission decision.
//!
//! [`TokenGuard::check`] decides, for one request, whether to admit it,
//! reject it, or admit it while rotating the credential pair. The decision
//! is pure with respect to shared state: it only reads the two presented
//! credentials and, on rotation, returns the new pair for the caller to
//! attach to its response.
//!
//! Order of evaluation, first match wins:
//!
//! 1. Either credential absent (or empty) → [`Rejection::MissingCredential`]
//! 2. Access credential verifies → admit with its subject, no rotation
//! 3. Renewal credential fails → [`Rejection::AuthenticationFailed`]
//! 4. Otherwise → admit with the renewal subject and a fresh pair

use super::{
    models::{CredentialKind, CredentialPair, SubjectId},
    signer::CredentialIssuer,
};
use log::{debug, error, info};
use std::sync::Arc;

/// Credentials presented by an inbound request
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentedCredentials<'a> {
    pub access: Option<&'a str>,
    pub renewal: Option<&'a str>,
}

impl<'a> PresentedCredentials<'a> {
    pub fn new(access: Option<&'a str>, renewal: Option<&'a str>) -> Self {
        Self { access, renewal }
    }
}

/// Why a request was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// One or both credentials were not presented
    MissingCredential,
    /// Access credential invalid and renewal credential invalid too
    AuthenticationFailed,
    /// Rotation could not mint a new pair
    Internal,
}

impl Rejection {
    /// HTTP status code for this rejection
    pub fn status_code(self) -> u16 {
        match self {
            Rejection::MissingCredential => 403,
            Rejection::AuthenticationFailed => 402,
            Rejection::Internal => 500,
        }
    }

    /// Client-facing message
    pub fn message(self) -> &'static str {
        match self {
            Rejection::MissingCredential => " Login Failed",
            Rejection::AuthenticationFailed => " Authentication Failed",
            Rejection::Internal => "Internal server error",
        }
    }

    /// Short label for logs and metrics
    pub fn label(self) -> &'static str {
        match self {
            Rejection::MissingCredential => "missing_credential",
            Rejection::AuthenticationFailed => "authentication_failed",
            Rejection::Internal => "internal",
        }
    }
}

/// An admitted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    /// Resolved subject identifier
    pub subject: SubjectId,
    /// New pair to hand back to the client, set only on the renewal path
    pub rotated: Option<CredentialPair>,
}

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Admit(Admission),
    Reject(Rejection),
}

impl GuardDecision {
    /// Label for logs and metrics: `admit`, `rotate`, or the rejection label
    pub fn label(&self) -> &'static str {
        match self {
            GuardDecision::Admit(Admission { rotated: None, .. }) => "admit",
            GuardDecision::Admit(Admission { rotated: Some(_), .. }) => "rotate",
            GuardDecision::Reject(rejection) => rejection.label(),
        }
    }
}

/// Verifies access credentials and rotates them through the renewal credential
#[derive(Debug, Clone)]
pub struct TokenGuard {
    issuer: Arc<CredentialIssuer>,
}

impl TokenGuard {
    pub fn new(issuer: Arc<CredentialIssuer>) -> Self {
        Self { issuer }
    }

    pub fn issuer(&self) -> &CredentialIssuer {
        &self.issuer
    }

    /// Decide whether a request carrying `presented` is admitted
    pub fn check(&self, presented: PresentedCredentials<'_>) -> GuardDecision {
        let (Some(access), Some(renewal)) = (
            presented.access.filter(|t| !t.is_empty()),
            presented.renewal.filter(|t| !t.is_empty()),
        ) else {
            return GuardDecision::Reject(Rejection::MissingCredential);
        };

        let access_err = match self.issuer.verify(CredentialKind::Access, access) {
            Ok(subject) => {
                return GuardDecision::Admit(Admission {
                    subject,
                    rotated: None,
                });
            }
            Err(e) => e,
        };
        debug!("Access credential rejected ({access_err}), trying renewal credential");

        let subject = match self.issuer.verify(CredentialKind::Renewal, renewal) {
            Ok(subject) => subject,
            Err(e) => {
                debug!("Renewal credential rejected: {e}");
                return GuardDecision::Reject(Rejection::AuthenticationFailed);
            }
        };

        match self.issuer.issue(&subject) {
            Ok(pair) => {
                info!("Rotated credentials for subject {subject}");
                GuardDecision::Admit(Admission {
                    subject,
                    rotated: Some(pair),
                })
            }
            Err(e) => {
                error!("Failed to mint rotated credentials for subject {subject}: {e}");
                GuardDecision::Reject(Rejection::Internal)
            }
        }
    }
}
