//! Hybrid credential extraction: Authorization header or cookie.
//!
//! Web clients authenticate via HttpOnly cookies the authority sets at
//! login; mobile clients send the token explicitly in the Authorization
//! header. The header always wins when both are present.

use http::HeaderMap;
use http::header::{AUTHORIZATION, COOKIE};

/// Cookie carrying the access token for browser clients.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
/// Cookie carrying the refresh token for browser clients.
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Extract the bearer token from the Authorization header, if present and
/// well-formed.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}

/// Read a named cookie from the request's Cookie headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(raw) = header.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some((key, value)) = pair.trim().split_once('=') {
                if key == name && !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// Extract the access token: Authorization header first, then the
/// `accessToken` cookie, else none.
pub fn extract_access_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = bearer_token(headers) {
        return Some(token.to_string());
    }
    cookie_value(headers, ACCESS_TOKEN_COOKIE)
}

/// Resolve the refresh token for logout: request body first, then the
/// `refreshToken` cookie.
pub fn resolve_refresh_token(body_token: Option<&str>, headers: &HeaderMap) -> Option<String> {
    if let Some(token) = body_token.filter(|t| !t.trim().is_empty()) {
        return Some(token.to_string());
    }
    cookie_value(headers, REFRESH_TOKEN_COOKIE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(auth: Option<&str>, cookie: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(auth) = auth {
            map.insert(AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        }
        if let Some(cookie) = cookie {
            map.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        map
    }

    #[test]
    fn header_token_extracted() {
        let h = headers(Some("Bearer abc.def.ghi"), None);
        assert_eq!(extract_access_token(&h).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn cookie_token_extracted_when_header_absent() {
        let h = headers(None, Some("theme=dark; accessToken=tok123; lang=en"));
        assert_eq!(extract_access_token(&h).as_deref(), Some("tok123"));
    }

    #[test]
    fn header_wins_over_cookie() {
        let h = headers(Some("Bearer header-tok"), Some("accessToken=cookie-tok"));
        assert_eq!(extract_access_token(&h).as_deref(), Some("header-tok"));
    }

    #[test]
    fn no_credential_yields_none() {
        let h = headers(None, None);
        assert_eq!(extract_access_token(&h), None);
    }

    #[test]
    fn non_bearer_scheme_is_ignored() {
        let h = headers(Some("Basic dXNlcjpwdw=="), None);
        assert_eq!(extract_access_token(&h), None);
    }

    #[test]
    fn refresh_body_wins_over_cookie() {
        let h = headers(None, Some("refreshToken=cookie-refresh"));
        assert_eq!(
            resolve_refresh_token(Some("body-refresh"), &h).as_deref(),
            Some("body-refresh")
        );
        assert_eq!(
            resolve_refresh_token(None, &h).as_deref(),
            Some("cookie-refresh")
        );
        assert_eq!(
            resolve_refresh_token(Some("  "), &h).as_deref(),
            Some("cookie-refresh")
        );
    }
}
