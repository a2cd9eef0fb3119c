use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    adapters::http::{app_state::AppState, extract::CurrentUser},
    app_error::AppResult,
};

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct SubmitPayload {
    store_id: Option<i64>,
    rating: Value,
    review: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct UpdatePayload {
    rating: Value,
    review: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_rating))
        .route("/mine", get(my_ratings))
        .route("/{id}", put(update_rating))
}

// Fractional, missing or non-numeric ratings map to 0, which validation rejects.
fn integer_rating(value: &Value) -> i32 {
    value
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .unwrap_or(0)
}

async fn submit_rating(
    State(app_state): State<AppState>,
    CurrentUser(claim): CurrentUser,
    Json(payload): Json<SubmitPayload>,
) -> AppResult<impl IntoResponse> {
    let rating = app_state
        .rating_use_cases
        .submit_rating(
            &claim,
            payload.store_id.unwrap_or(0),
            integer_rating(&payload.rating),
            payload.review,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Rating submitted successfully", "rating": rating })),
    ))
}

async fn update_rating(
    State(app_state): State<AppState>,
    CurrentUser(claim): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePayload>,
) -> AppResult<impl IntoResponse> {
    let rating = app_state
        .rating_use_cases
        .update_rating(&claim, id, integer_rating(&payload.rating), payload.review)
        .await?;
    Ok(Json(json!({ "message": "Rating updated successfully", "rating": rating })))
}

async fn my_ratings(
    State(app_state): State<AppState>,
    CurrentUser(claim): CurrentUser,
) -> AppResult<impl IntoResponse> {
    let ratings = app_state.rating_use_cases.my_ratings(&claim).await?;
    Ok(Json(json!({ "ratings": ratings })))
}
