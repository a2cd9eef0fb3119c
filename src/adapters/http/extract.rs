use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::{
    adapters::http::{app_state::AppState, session::SESSION_COOKIE},
    app_error::AppError,
    domain::entities::identity::IdentityClaim,
};

/// The verified identity behind the session cookie.
///
/// API handlers take this instead of reading the cookie themselves. A missing
/// or invalid token rejects the request with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub IdentityClaim);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Err(AppError::InvalidToken);
        };
        let claim = state.token_codec.verify(cookie.value()).map_err(|reason| {
            tracing::debug!(%reason, "session token rejected");
            AppError::from(reason)
        })?;
        Ok(CurrentUser(claim))
    }
}
