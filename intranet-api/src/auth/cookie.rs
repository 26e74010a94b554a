//! Token read from the session cookie.

use std::sync::RwLock;

use async_trait::async_trait;

use super::token::{AccessToken, TokenProvider};
use crate::error::AuthError;

/// Cookie the login page stores the token in.
pub const DEFAULT_TOKEN_COOKIE: &str = "token";

/// Extract a cookie value from a `Cookie` header string.
///
/// ```
/// use intranet_api::auth::cookie_value;
///
/// assert_eq!(cookie_value("theme=dark; token=abc", "token"), Some("abc"));
/// ```
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|value| !value.is_empty())
}

/// Reads the bearer token from a `Cookie` header.
///
/// The header can be replaced when the session changes; the next request
/// picks up the new token.
#[derive(Debug)]
pub struct CookieTokenProvider {
    cookie_name: String,
    header: RwLock<String>,
}

impl CookieTokenProvider {
    /// Reads the token from the default `token` cookie.
    pub fn new(header: impl Into<String>) -> Self {
        Self::with_cookie_name(header, DEFAULT_TOKEN_COOKIE)
    }

    /// Reads the token from a custom cookie name.
    pub fn with_cookie_name(header: impl Into<String>, cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            header: RwLock::new(header.into()),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Replace the cookie header (e.g. after logging in again).
    pub fn set_header(&self, header: impl Into<String>) {
        if let Ok(mut guard) = self.header.write() {
            *guard = header.into();
        }
    }

    /// Current token, if the cookie is present.
    pub fn token(&self) -> Option<String> {
        self.header
            .read()
            .ok()
            .and_then(|h| cookie_value(&h, &self.cookie_name).map(str::to_string))
    }
}

#[async_trait]
impl TokenProvider for CookieTokenProvider {
    async fn get_token(&self, _resource: &str) -> Result<AccessToken, AuthError> {
        self.token()
            .map(AccessToken::new)
            .ok_or_else(|| AuthError::MissingToken {
                cookie: self.cookie_name.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value_picks_named_cookie() {
        let header = "lang=es; token=eyJhbGciOi; theme=dark";
        assert_eq!(cookie_value(header, "token"), Some("eyJhbGciOi"));
        assert_eq!(cookie_value(header, "lang"), Some("es"));
        assert_eq!(cookie_value(header, "missing"), None);
    }

    #[test]
    fn test_cookie_value_ignores_empty_and_quotes() {
        assert_eq!(cookie_value("token=", "token"), None);
        assert_eq!(cookie_value("token=\"abc\"", "token"), Some("abc"));
        assert_eq!(cookie_value("", "token"), None);
    }

    #[test]
    fn test_set_header_replaces_token() {
        let provider = CookieTokenProvider::new("token=old");
        provider.set_header("token=new");
        assert_eq!(provider.token().as_deref(), Some("new"));
    }
}
