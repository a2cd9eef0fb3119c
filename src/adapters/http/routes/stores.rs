use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    adapters::http::{app_state::AppState, extract::CurrentUser},
    app_error::AppResult,
    domain::entities::store::StoreInput,
};

#[derive(Deserialize, Default)]
#[serde(default)]
struct StorePayload {
    name: String,
    description: Option<String>,
    address: String,
    phone: Option<String>,
    email: Option<String>,
    website: Option<String>,
}

impl From<StorePayload> for StoreInput {
    fn from(payload: StorePayload) -> Self {
        StoreInput {
            name: payload.name,
            description: payload.description,
            address: payload.address,
            phone: payload.phone,
            email: payload.email,
            website: payload.website,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stores).post(create_store))
        .route("/mine", get(my_stores))
        .route("/mine/reviews", get(my_reviews))
        .route("/{id}", get(get_store).put(update_store))
}

async fn list_stores(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stores = app_state.store_use_cases.list_stores().await?;
    Ok(Json(json!({ "stores": stores })))
}

async fn get_store(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let detail = app_state.store_use_cases.store_detail(id).await?;
    Ok(Json(detail))
}

async fn create_store(
    State(app_state): State<AppState>,
    CurrentUser(claim): CurrentUser,
    Json(payload): Json<StorePayload>,
) -> AppResult<impl IntoResponse> {
    let store = app_state
        .store_use_cases
        .create_store(&claim, payload.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Store created successfully", "store": store })),
    ))
}

async fn update_store(
    State(app_state): State<AppState>,
    CurrentUser(claim): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<StorePayload>,
) -> AppResult<impl IntoResponse> {
    let store = app_state
        .store_use_cases
        .update_store(&claim, id, payload.into())
        .await?;
    Ok(Json(json!({ "message": "Store updated successfully", "store": store })))
}

async fn my_stores(
    State(app_state): State<AppState>,
    CurrentUser(claim): CurrentUser,
) -> AppResult<impl IntoResponse> {
    let stores = app_state.store_use_cases.owner_stores(&claim).await?;
    Ok(Json(json!({ "stores": stores })))
}

async fn my_reviews(
    State(app_state): State<AppState>,
    CurrentUser(claim): CurrentUser,
) -> AppResult<impl IntoResponse> {
    let reviews = app_state.store_use_cases.owner_reviews(&claim).await?;
    Ok(Json(json!({ "reviews": reviews })))
}
