use chrono::NaiveDateTime;
use serde::Serialize;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rating {
    pub id: i64,
    pub user_id: i64,
    pub store_id: i64,
    pub rating: i32,
    pub review: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A rating joined with the names of its store and author.
#[derive(Debug, Clone, Serialize)]
pub struct RatingDetail {
    #[serde(flatten)]
    pub rating: Rating,
    pub store_name: String,
    pub user_name: String,
}
