use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    adapters::http::{app_state::AppState, extract::CurrentUser},
    app_error::AppResult,
    use_cases::profile::ProfileUpdate,
};

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct ProfilePayload {
    name: String,
    email: String,
    current_password: Option<String>,
    new_password: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

async fn get_profile(
    State(app_state): State<AppState>,
    CurrentUser(claim): CurrentUser,
) -> AppResult<impl IntoResponse> {
    let user = app_state.profile_use_cases.get_profile(&claim).await?;
    Ok(Json(json!({ "user": user })))
}

async fn update_profile(
    State(app_state): State<AppState>,
    CurrentUser(claim): CurrentUser,
    Json(payload): Json<ProfilePayload>,
) -> AppResult<impl IntoResponse> {
    let update = ProfileUpdate {
        name: payload.name,
        email: payload.email,
        current_password: payload.current_password,
        new_password: payload.new_password,
    };
    let user = app_state
        .profile_use_cases
        .update_profile(&claim, update)
        .await?;
    Ok(Json(json!({ "message": "Profile updated successfully", "user": user })))
}
