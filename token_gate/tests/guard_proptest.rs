/// Property-based tests for the token guard using proptest
///
/// Each property generates subjects and credential states (valid, expired,
/// signed with the wrong secret, garbage, absent) and checks the admission
/// decision against the expected outcome.
use chrono::Duration;
use proptest::prelude::*;
use std::sync::Arc;
use token_gate::auth::{
    CredentialIssuer, CredentialKind, GuardDecision, JwtSigner, PresentedCredentials, Rejection,
    TokenGuard, TokenSigner,
};

const ACCESS_SECRET: &str = "access_secret_for_testing_only_0123456789";
const RENEWAL_SECRET: &str = "renewal_secret_for_testing_only_0123456789";
const FOREIGN_SECRET: &str = "foreign_secret_for_testing_only_0123456789";

/// State of a single presented credential
#[derive(Debug, Clone, Copy)]
enum Presented {
    Valid,
    Expired,
    WrongSecret,
    Garbage,
    Absent,
}

impl Presented {
    fn is_valid(self) -> bool {
        matches!(self, Presented::Valid)
    }
}

fn presented_strategy() -> impl Strategy<Value = Presented> {
    prop_oneof![
        Just(Presented::Valid),
        Just(Presented::Expired),
        Just(Presented::WrongSecret),
        Just(Presented::Garbage),
        Just(Presented::Absent),
    ]
}

fn present_strategy() -> impl Strategy<Value = Presented> {
    presented_strategy().prop_filter("credential must be present", |p| {
        !matches!(p, Presented::Absent)
    })
}

fn subject_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,36}"
}

fn guard() -> TokenGuard {
    TokenGuard::new(Arc::new(CredentialIssuer::new(
        Arc::new(JwtSigner::new()),
        ACCESS_SECRET,
        RENEWAL_SECRET,
    )))
}

fn make_token(state: Presented, subject: &str, kind: CredentialKind) -> Option<String> {
    let signer = JwtSigner::new();
    let (secret, lifetime) = match kind {
        CredentialKind::Access => (ACCESS_SECRET, Duration::minutes(10)),
        CredentialKind::Renewal => (RENEWAL_SECRET, Duration::days(1)),
    };

    match state {
        Presented::Valid => Some(signer.sign(subject, secret, lifetime).unwrap()),
        Presented::Expired => Some(signer.sign(subject, secret, Duration::seconds(-120)).unwrap()),
        Presented::WrongSecret => Some(signer.sign(subject, FOREIGN_SECRET, lifetime).unwrap()),
        Presented::Garbage => Some(format!("{subject}.not.a.token")),
        Presented::Absent => None,
    }
}

proptest! {
    #[test]
    fn test_missing_either_credential_is_login_failed(
        subject in subject_strategy(),
        other in presented_strategy(),
        missing_access in any::<bool>(),
    ) {
        let (access, renewal) = if missing_access {
            (None, make_token(other, &subject, CredentialKind::Renewal))
        } else {
            (make_token(other, &subject, CredentialKind::Access), None)
        };

        let decision =
            guard().check(PresentedCredentials::new(access.as_deref(), renewal.as_deref()));
        prop_assert_eq!(decision, GuardDecision::Reject(Rejection::MissingCredential));
    }

    #[test]
    fn test_valid_access_never_rotates(
        subject in subject_strategy(),
        renewal_state in present_strategy(),
    ) {
        let access = make_token(Presented::Valid, &subject, CredentialKind::Access);
        let renewal = make_token(renewal_state, "someone_else", CredentialKind::Renewal);

        let decision =
            guard().check(PresentedCredentials::new(access.as_deref(), renewal.as_deref()));
        let GuardDecision::Admit(admission) = decision else {
            return Err(TestCaseError::fail("valid access credential must be admitted"));
        };
        prop_assert_eq!(admission.subject, subject);
        prop_assert!(admission.rotated.is_none());
    }

    #[test]
    fn test_invalid_access_follows_renewal(
        access_subject in subject_strategy(),
        renewal_subject in subject_strategy(),
        access_state in present_strategy(),
        renewal_state in present_strategy(),
    ) {
        prop_assume!(!access_state.is_valid());

        let access = make_token(access_state, &access_subject, CredentialKind::Access);
        let renewal = make_token(renewal_state, &renewal_subject, CredentialKind::Renewal);
        let guard = guard();

        let decision =
            guard.check(PresentedCredentials::new(access.as_deref(), renewal.as_deref()));

        if renewal_state.is_valid() {
            let GuardDecision::Admit(admission) = decision else {
                return Err(TestCaseError::fail("valid renewal credential must be admitted"));
            };
            prop_assert_eq!(&admission.subject, &renewal_subject);

            let pair = admission.rotated.expect("renewal path rotates");
            prop_assert_eq!(
                guard.issuer().verify(CredentialKind::Access, &pair.access_token).unwrap(),
                renewal_subject.clone()
            );
            prop_assert_eq!(
                guard.issuer().verify(CredentialKind::Renewal, &pair.refresh_token).unwrap(),
                renewal_subject
            );
        } else {
            prop_assert_eq!(decision, GuardDecision::Reject(Rejection::AuthenticationFailed));
        }
    }

    #[test]
    fn test_sign_verify_round_trip_and_secret_separation(subject in subject_strategy()) {
        let signer = JwtSigner::new();
        let token = signer.sign(&subject, ACCESS_SECRET, Duration::minutes(10)).unwrap();

        prop_assert_eq!(signer.verify(&token, ACCESS_SECRET).unwrap(), subject);
        prop_assert!(signer.verify(&token, RENEWAL_SECRET).is_err());
    }
}
