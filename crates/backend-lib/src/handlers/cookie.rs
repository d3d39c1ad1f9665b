//! Session cookie encoding and extraction.
use axum::http::{header::COOKIE, header::InvalidHeaderValue, HeaderMap, HeaderValue};

use crate::config::Settings;

/// Build a `HttpOnly` cookie carrying the session token
pub fn session_cookie(settings: &Settings, token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let session = &settings.session;
    let mut cookie = format!(
        "{}={token}; Path={}; HttpOnly; SameSite=Lax; Max-Age={}",
        session.cookie_name,
        settings.cookie_path(),
        session.ttl_secs
    );
    if session.cookie_secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Expire the session cookie in the browser
pub fn clear_session_cookie(settings: &Settings) -> Result<HeaderValue, InvalidHeaderValue> {
    let session = &settings.session;
    let mut cookie = format!(
        "{}=; Path={}; HttpOnly; SameSite=Lax; Max-Age=0",
        session.cookie_name,
        settings.cookie_path()
    );
    if session.cookie_secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Read the session token from the `Cookie` header(s), if any
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == cookie_name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_session_cookie_attributes() {
        let mut settings = Settings::default();
        let cookie = session_cookie(&settings, "abc").unwrap();
        assert_eq!(
            cookie.to_str().unwrap(),
            "authgate_session=abc; Path=/; HttpOnly; SameSite=Lax; Max-Age=86400"
        );

        settings.base_path = "/auth".to_string();
        settings.session.cookie_secure = true;
        let cookie = session_cookie(&settings, "abc").unwrap();
        let value = cookie.to_str().unwrap();
        assert!(value.contains("Path=/auth;"));
        assert!(value.ends_with("; Secure"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie(&Settings::default()).unwrap();
        let value = cookie.to_str().unwrap();
        assert!(value.starts_with("authgate_session=;"));
        assert!(value.contains("Max-Age=0"));
    }

    #[test]
    fn test_session_token_extraction() {
        let name = "authgate_session";
        assert_eq!(
            session_token(&headers("theme=dark; authgate_session=tok123"), name),
            Some("tok123".to_string())
        );
        assert_eq!(session_token(&headers("theme=dark"), name), None);
        assert_eq!(session_token(&headers("authgate_session="), name), None);
        assert_eq!(session_token(&HeaderMap::new(), name), None);
    }
}
