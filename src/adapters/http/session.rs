//! Session cookie carrying the token issued at login.

use axum::http::{HeaderMap, HeaderValue};
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use crate::app_error::{AppError, AppResult};

pub const SESSION_COOKIE: &str = "auth-token";

pub fn session_cookie(token: String, ttl: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(ttl)
        .build()
}

/// Tells the browser to discard the session cookie.
pub fn cleared_session_cookie(secure: bool) -> Cookie<'static> {
    session_cookie(String::new(), Duration::seconds(0), secure)
}

pub fn append_cookie(headers: &mut HeaderMap, cookie: Cookie<'_>) -> AppResult<()> {
    let value = HeaderValue::from_str(&cookie.to_string())
        .map_err(|_| AppError::Internal("Failed to build cookie header".into()))?;
    headers.append("set-cookie", value);
    Ok(())
}
