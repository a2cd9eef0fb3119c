//! Page routes mounted behind the request gate.
//!
//! Each page answers with the JSON view data a front end renders. The gate
//! has already checked the route policy; the claim it verified arrives as a
//! request extension.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    domain::entities::{identity::IdentityClaim, role::Role},
};

const OWNER_STORES_PATH: &str = "/store-owner/stores";

#[derive(Serialize)]
pub struct PageView<T: Serialize> {
    pub page: &'static str,
    pub viewer: Option<IdentityClaim>,
    pub data: T,
}

fn view<T: Serialize>(page: &'static str, viewer: Option<IdentityClaim>, data: T) -> Response {
    Json(PageView { page, viewer, data }).into_response()
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/login", get(login))
        .route("/register", get(register))
        .route("/stores", get(stores))
        .route("/stores/{id}", get(store))
        .route("/stores/{id}/rate", get(rate_store))
        .route("/my-reviews", get(my_reviews))
        .route("/profile", get(profile))
        .route("/dashboard", get(dashboard))
        .route("/admin", get(dashboard))
        .route("/admin/users", get(admin_users))
        .route("/admin/analytics", get(admin_analytics))
        .route("/store-owner/stores", get(owner_stores))
        .route("/store-owner/stores/new", get(new_store))
        .route("/store-owner/stores/{id}/edit", get(edit_store))
        .route("/store-owner/reviews", get(owner_reviews))
        .fallback(not_found)
}

// Also sits behind the gate, so unknown paths need a session like any other page.
async fn not_found() -> AppError {
    AppError::NotFound
}

async fn home() -> Response {
    view(
        "home",
        None,
        json!({ "login": "/login", "register": "/register", "stores": "/stores" }),
    )
}

async fn login() -> Response {
    view("login", None, json!({ "action": "/api/auth/login" }))
}

async fn register() -> Response {
    view(
        "register",
        None,
        json!({
            "action": "/api/auth/register",
            "roles": [Role::Customer, Role::StoreOwner],
        }),
    )
}

async fn stores(
    State(app_state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
) -> AppResult<Response> {
    let stores = app_state.store_use_cases.list_stores().await?;
    Ok(view("stores", Some(claim), stores))
}

async fn store(
    State(app_state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let detail = app_state.store_use_cases.store_detail(id).await?;
    Ok(view("stores/detail", Some(claim), detail))
}

async fn rate_store(
    State(app_state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    if !claim.has_role(Role::Customer) {
        return Ok(Redirect::temporary(claim.role.landing_path()).into_response());
    }
    let detail = app_state.store_use_cases.store_detail(id).await?;
    let existing = app_state
        .rating_use_cases
        .my_rating_for_store(&claim, id)
        .await?;
    Ok(view(
        "stores/rate",
        Some(claim),
        json!({ "store": detail.store, "existing_rating": existing }),
    ))
}

async fn my_reviews(
    State(app_state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
) -> AppResult<Response> {
    if !claim.has_role(Role::Customer) {
        return Ok(Redirect::temporary(claim.role.landing_path()).into_response());
    }
    let ratings = app_state.rating_use_cases.my_ratings(&claim).await?;
    Ok(view("my-reviews", Some(claim), ratings))
}

async fn profile(
    State(app_state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
) -> AppResult<Response> {
    let user = app_state.profile_use_cases.get_profile(&claim).await?;
    Ok(view("profile", Some(claim), user))
}

async fn dashboard(
    State(app_state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
) -> AppResult<Response> {
    let overview = app_state.analytics_use_cases.overview(&claim).await?;
    Ok(view("admin", Some(claim), overview))
}

async fn admin_users(
    State(app_state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
) -> AppResult<Response> {
    let users = app_state.analytics_use_cases.users(&claim).await?;
    Ok(view("admin/users", Some(claim), users))
}

async fn admin_analytics(
    State(app_state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
) -> AppResult<Response> {
    let overview = app_state.analytics_use_cases.overview(&claim).await?;
    Ok(view("admin/analytics", Some(claim), overview))
}

async fn owner_stores(
    State(app_state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
) -> AppResult<Response> {
    let stores = app_state.store_use_cases.owner_stores(&claim).await?;
    Ok(view("store-owner/stores", Some(claim), stores))
}

async fn new_store(Extension(claim): Extension<IdentityClaim>) -> Response {
    view(
        "store-owner/stores/new",
        Some(claim),
        json!({ "action": "/api/stores" }),
    )
}

// Stores the caller does not own are treated like missing ones.
async fn edit_store(
    State(app_state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let stores = app_state.store_use_cases.owner_stores(&claim).await?;
    let Some(store) = stores.into_iter().find(|s| s.store.id == id) else {
        return Ok(Redirect::temporary(OWNER_STORES_PATH).into_response());
    };
    Ok(view("store-owner/stores/edit", Some(claim), store))
}

async fn owner_reviews(
    State(app_state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
) -> AppResult<Response> {
    let reviews = app_state.store_use_cases.owner_reviews(&claim).await?;
    Ok(view("store-owner/reviews", Some(claim), reviews))
}
