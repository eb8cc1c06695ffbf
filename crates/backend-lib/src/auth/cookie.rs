// ============================
// crates/backend-lib/src/auth/cookie.rs
// ============================
//! Session cookie formatting and parsing.
use std::time::Duration;

use axum::http::{header, HeaderMap};

/// Name of the cookie carrying the session token
pub const AUTH_COOKIE_NAME: &str = "token";

/// Attributes shared by every session cookie
#[derive(Debug, Clone, Copy)]
pub struct CookieConfig {
    pub secure: bool,
    pub max_age: Duration,
}

/// `Set-Cookie` value that stores `token`
pub fn create_auth_cookie(token: &str, config: CookieConfig) -> String {
    build(token, config.max_age.as_secs(), config.secure)
}

/// `Set-Cookie` value that clears the session
pub fn create_logout_cookie(config: CookieConfig) -> String {
    build("", 0, config.secure)
}

fn build(value: &str, max_age: u64, secure: bool) -> String {
    let mut cookie =
        format!("{AUTH_COOKIE_NAME}={value}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Session token from the request's `Cookie` headers.
/// Empty values count as absent.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE_NAME)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
