use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Store {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Store fields a store owner may set. Blank optional fields are stored as NULL.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoreInput {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

/// A store with its owner and rating aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSummary {
    #[serde(flatten)]
    pub store: Store,
    pub owner_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    /// 0.0 when the store has no ratings yet.
    pub avg_rating: f64,
    pub review_count: i64,
}

impl StoreSummary {
    /// Drops owner contact details for listings visible to everyone.
    pub fn public(mut self) -> Self {
        self.owner_email = None;
        self
    }
}
