use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde_json::json;

use crate::{
    adapters::http::{app_state::AppState, extract::CurrentUser},
    app_error::AppResult,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/stores", get(list_stores))
        .route("/analytics", get(analytics))
}

async fn list_users(
    State(app_state): State<AppState>,
    CurrentUser(claim): CurrentUser,
) -> AppResult<impl IntoResponse> {
    let users = app_state.analytics_use_cases.users(&claim).await?;
    Ok(Json(json!({ "users": users })))
}

async fn list_stores(
    State(app_state): State<AppState>,
    CurrentUser(claim): CurrentUser,
) -> AppResult<impl IntoResponse> {
    let stores = app_state.store_use_cases.admin_stores(&claim).await?;
    Ok(Json(json!({ "stores": stores })))
}

async fn analytics(
    State(app_state): State<AppState>,
    CurrentUser(claim): CurrentUser,
) -> AppResult<impl IntoResponse> {
    let overview = app_state.analytics_use_cases.overview(&claim).await?;
    Ok(Json(overview))
}
