pub mod admin;
pub mod auth;
pub mod pages;
pub mod ratings;
pub mod stores;
pub mod user;

use axum::Router;

use crate::{adapters::http::app_state::AppState, app_error::AppError};

/// JSON endpoints mounted under `/api`. Each handler verifies the session
/// itself through `CurrentUser`; none of these sit behind the request gate.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/stores", stores::router())
        .nest("/ratings", ratings::router())
        .nest("/user", user::router())
        .nest("/admin", admin::router())
        .fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::NotFound
}
