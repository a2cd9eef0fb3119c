use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{Row, postgres::PgRow};

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::role::Role,
    use_cases::analytics::{AnalyticsRepo, PlatformTotals},
};

fn row_to_totals(row: &PgRow) -> Result<PlatformTotals, sqlx::Error> {
    Ok(PlatformTotals {
        total_users: row.try_get("total_users")?,
        customers: row.try_get("customers")?,
        store_owners: row.try_get("store_owners")?,
        total_stores: row.try_get("total_stores")?,
        total_ratings: row.try_get("total_ratings")?,
        average_rating: row.try_get("average_rating")?,
        new_users: row.try_get("new_users")?,
        new_stores: row.try_get("new_stores")?,
        new_ratings: row.try_get("new_ratings")?,
    })
}

#[async_trait]
impl AnalyticsRepo for PostgresPersistence {
    async fn platform_totals(&self, since: NaiveDateTime) -> AppResult<PlatformTotals> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM users WHERE role = $2) AS customers,
                (SELECT COUNT(*) FROM users WHERE role = $3) AS store_owners,
                (SELECT COUNT(*) FROM stores) AS total_stores,
                (SELECT COUNT(*) FROM ratings) AS total_ratings,
                (SELECT COALESCE(AVG(rating)::float8, 0) FROM ratings) AS average_rating,
                (SELECT COUNT(*) FROM users WHERE created_at >= $1) AS new_users,
                (SELECT COUNT(*) FROM stores WHERE created_at >= $1) AS new_stores,
                (SELECT COUNT(*) FROM ratings WHERE created_at >= $1) AS new_ratings
            "#,
        )
        .bind(since)
        .bind(Role::Customer)
        .bind(Role::StoreOwner)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row_to_totals(&row)?)
    }

    async fn rating_counts(&self) -> AppResult<Vec<(i32, i64)>> {
        let rows: Vec<(i32, i64)> =
            sqlx::query_as("SELECT rating, COUNT(*) FROM ratings GROUP BY rating")
                .fetch_all(&self.pool)
                .await
                .map_err(AppError::from)?;

        Ok(rows)
    }
}
