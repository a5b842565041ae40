//! Credential cookie transport.
//!
//! Credentials travel as the `authToken` and `refreshToken` cookies. They are
//! always `HttpOnly` and carry no `Max-Age`; the embedded expiry claim is the
//! only lifetime.

use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, InvalidHeaderValue, SET_COOKIE},
};
use token_gate::auth::{CredentialKind, CredentialPair};

/// Read a named cookie from the request headers
///
/// All `Cookie` headers are scanned; the first matching pair wins.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            (key.trim() == name).then(|| val.trim().to_string())
        })
        .next()
}

/// Read the credential of `kind` from its cookie
pub fn read_credential(headers: &HeaderMap, kind: CredentialKind) -> Option<String> {
    read_cookie(headers, kind.slot_name())
}

/// Build the `Set-Cookie` value storing a credential
pub fn credential_cookie(
    kind: CredentialKind,
    token: &str,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{}={token}; Path=/; HttpOnly", kind.slot_name());
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn clear_cookie(kind: CredentialKind, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{}=; Path=/; HttpOnly; Max-Age=0", kind.slot_name());
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Build the `Set-Cookie` values storing both credentials of a pair
pub fn pair_cookies(
    pair: &CredentialPair,
    secure: bool,
) -> Result<[HeaderValue; 2], InvalidHeaderValue> {
    Ok([
        credential_cookie(CredentialKind::Access, &pair.access_token, secure)?,
        credential_cookie(CredentialKind::Renewal, &pair.refresh_token, secure)?,
    ])
}

/// Append `Set-Cookie` headers for both credentials of a pair
pub fn append_pair(
    headers: &mut HeaderMap,
    pair: &CredentialPair,
    secure: bool,
) -> Result<(), InvalidHeaderValue> {
    for cookie in pair_cookies(pair, secure)? {
        headers.append(SET_COOKIE, cookie);
    }
    Ok(())
}

/// Append `Set-Cookie` headers expiring both credential cookies
pub fn append_cleared(headers: &mut HeaderMap, secure: bool) -> Result<(), InvalidHeaderValue> {
    headers.append(SET_COOKIE, clear_cookie(CredentialKind::Access, secure)?);
    headers.append(SET_COOKIE, clear_cookie(CredentialKind::Renewal, secure)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; authToken=abc.def.ghi ; refreshToken=xyz"),
        );

        assert_eq!(
            read_credential(&headers, CredentialKind::Access).as_deref(),
            Some("abc.def.ghi")
        );
        assert_eq!(read_credential(&headers, CredentialKind::Renewal).as_deref(), Some("xyz"));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_read_cookie_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("authToken=a"));
        headers.append(COOKIE, HeaderValue::from_static("refreshToken=r"));

        assert_eq!(read_credential(&headers, CredentialKind::Access).as_deref(), Some("a"));
        assert_eq!(read_credential(&headers, CredentialKind::Renewal).as_deref(), Some("r"));
    }

    #[test]
    fn test_empty_cookie_value_is_returned_as_empty() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("authToken="));
        assert_eq!(read_credential(&headers, CredentialKind::Access).as_deref(), Some(""));
    }

    #[test]
    fn test_credential_cookie_flags() {
        let cookie = credential_cookie(CredentialKind::Access, "tok", false).unwrap();
        assert_eq!(cookie.to_str().unwrap(), "authToken=tok; Path=/; HttpOnly");

        let cookie = credential_cookie(CredentialKind::Renewal, "tok", true).unwrap();
        assert_eq!(cookie.to_str().unwrap(), "refreshToken=tok; Path=/; HttpOnly; Secure");
    }

    #[test]
    fn test_append_pair_sets_two_cookies() {
        let mut headers = HeaderMap::new();
        let pair = CredentialPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        };
        append_pair(&mut headers, &pair, false).unwrap();

        let values: Vec<_> = headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(values.len(), 2);
        assert!(values[0].starts_with("authToken=a;"));
        assert!(values[1].starts_with("refreshToken=r;"));
    }

    #[test]
    fn test_append_cleared_expires_cookies() {
        let mut headers = HeaderMap::new();
        append_cleared(&mut headers, false).unwrap();
        assert!(
            headers
                .get_all(SET_COOKIE)
                .iter()
                .all(|v| v.to_str().unwrap().contains("Max-Age=0"))
        );
    }
}
