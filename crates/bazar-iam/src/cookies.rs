//! Authentication cookie management.
//!
//! Browsers carry tokens in HttpOnly cookies the authority sets here;
//! mobile clients read the same tokens from the response body and ignore
//! the cookies. Clearing resets the cookies with `Max-Age=0`.

use axum::http::{HeaderMap, HeaderValue};
use http::header::SET_COOKIE;

use bazar_auth::credentials::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use bazar_core::config::CookieConfig;

/// Writes the `accessToken` / `refreshToken` cookies per configuration.
#[derive(Debug, Clone)]
pub struct CookieWriter {
    config: CookieConfig,
}

impl CookieWriter {
    /// Create a writer from cookie configuration.
    pub fn new(config: CookieConfig) -> Self {
        Self { config }
    }

    /// Set both auth cookies after register or login.
    pub fn set_auth_cookies(
        &self,
        headers: &mut HeaderMap,
        access_token: &str,
        refresh_token: &str,
        access_max_age: i64,
        refresh_max_age: i64,
    ) {
        self.append(headers, ACCESS_TOKEN_COOKIE, access_token, access_max_age);
        self.append(headers, REFRESH_TOKEN_COOKIE, refresh_token, refresh_max_age);
    }

    /// Refresh only the access token cookie; the refresh cookie keeps its
    /// original value and lifetime semantics.
    pub fn set_access_cookie(&self, headers: &mut HeaderMap, access_token: &str, max_age: i64) {
        self.append(headers, ACCESS_TOKEN_COOKIE, access_token, max_age);
    }

    /// Clear both auth cookies on logout.
    pub fn clear_auth_cookies(&self, headers: &mut HeaderMap) {
        self.append(headers, ACCESS_TOKEN_COOKIE, "", 0);
        self.append(headers, REFRESH_TOKEN_COOKIE, "", 0);
    }

    fn append(&self, headers: &mut HeaderMap, name: &str, value: &str, max_age: i64) {
        if let Ok(header_value) = HeaderValue::from_str(&self.build(name, value, max_age)) {
            headers.append(SET_COOKIE, header_value);
        }
    }

    /// Build one Set-Cookie value.
    ///
    /// `SameSite=None` requires `Secure`, so it is only honored in
    /// production; development always gets `Lax` over plain HTTP.
    fn build(&self, name: &str, value: &str, max_age: i64) -> String {
        let is_production = self.config.is_production();
        let same_site = if self.config.same_site_none && is_production {
            "None"
        } else {
            "Lax"
        };

        let mut cookie = format!("{name}={value}; HttpOnly; Path=/; Max-Age={max_age}");
        if is_production {
            cookie.push_str("; Secure");
        }
        if !self.config.domain.is_empty() {
            cookie.push_str(&format!("; Domain={}", self.config.domain));
        }
        cookie.push_str(&format!("; SameSite={same_site}"));
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer(environment: &str, same_site_none: bool, domain: &str) -> CookieWriter {
        CookieWriter::new(CookieConfig {
            domain: domain.to_string(),
            same_site_none,
            environment: environment.to_string(),
        })
    }

    #[test]
    fn development_cookie_is_lax_without_secure() {
        let cookie = writer("development", false, "").build("accessToken", "tok", 7200);
        assert_eq!(
            cookie,
            "accessToken=tok; HttpOnly; Path=/; Max-Age=7200; SameSite=Lax"
        );
    }

    #[test]
    fn production_cookie_is_secure() {
        let cookie = writer("production", false, "").build("accessToken", "tok", 7200);
        assert!(cookie.contains("; Secure"));
        assert!(cookie.ends_with("SameSite=Lax"));
    }

    #[test]
    fn same_site_none_only_in_production() {
        let dev = writer("development", true, "").build("accessToken", "tok", 60);
        assert!(dev.ends_with("SameSite=Lax"));

        let prod = writer("production", true, "").build("accessToken", "tok", 60);
        assert!(prod.contains("; Secure"));
        assert!(prod.ends_with("SameSite=None"));
    }

    #[test]
    fn domain_is_included_when_configured() {
        let cookie = writer("production", false, ".example.com").build("refreshToken", "r", 60);
        assert!(cookie.contains("; Domain=.example.com"));
    }

    #[test]
    fn clearing_sets_max_age_zero() {
        let mut headers = HeaderMap::new();
        writer("development", false, "").clear_auth_cookies(&mut headers);

        let values: Vec<_> = headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(values.len(), 2);
        assert!(values.iter().all(|v| v.contains("Max-Age=0")));
        assert!(values.iter().any(|v| v.starts_with("accessToken=;")));
        assert!(values.iter().any(|v| v.starts_with("refreshToken=;")));
    }
}
