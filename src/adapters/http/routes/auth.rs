use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    adapters::http::{
        app_state::AppState,
        extract::CurrentUser,
        session::{append_cookie, cleared_session_cookie, session_cookie},
    },
    app_error::{AppError, AppResult},
    domain::entities::role::Role,
};

#[derive(Deserialize, Default)]
#[serde(default)]
struct RegisterPayload {
    name: String,
    email: String,
    password: String,
    role: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct LoginPayload {
    email: String,
    password: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> AppResult<impl IntoResponse> {
    let role = payload
        .role
        .as_deref()
        .map(str::parse::<Role>)
        .transpose()
        .map_err(AppError::InvalidInput)?;

    let user = app_state
        .auth_use_cases
        .register(&payload.name, &payload.email, &payload.password, role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully", "user": user })),
    ))
}

async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> AppResult<impl IntoResponse> {
    let outcome = app_state
        .auth_use_cases
        .login(&payload.email, &payload.password)
        .await?;

    let mut headers = HeaderMap::new();
    append_cookie(
        &mut headers,
        session_cookie(
            outcome.token,
            app_state.token_codec.ttl(),
            app_state.config.cookie_secure,
        ),
    )?;

    Ok((
        headers,
        Json(json!({
            "message": "Login successful",
            "user": outcome.user,
            "redirect": outcome.redirect,
        })),
    ))
}

async fn logout(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut headers = HeaderMap::new();
    append_cookie(
        &mut headers,
        cleared_session_cookie(app_state.config.cookie_secure),
    )?;
    Ok((headers, Json(json!({ "message": "Logged out successfully" }))))
}

async fn me(CurrentUser(claim): CurrentUser) -> Json<serde_json::Value> {
    Json(json!({ "user": claim }))
}
