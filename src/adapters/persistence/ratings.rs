use async_trait::async_trait;
use sqlx::{Row, postgres::PgRow};

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::rating::{Rating, RatingDetail},
    use_cases::rating::RatingRepo,
};

const RATING_COLUMNS: &str = "id, user_id, store_id, rating, review, created_at, updated_at";

const DETAIL_SELECT: &str = r#"
    SELECT
        r.id, r.user_id, r.store_id, r.rating, r.review, r.created_at, r.updated_at,
        s.name AS store_name,
        u.name AS user_name
    FROM ratings r
    JOIN stores s ON s.id = r.store_id
    JOIN users u ON u.id = r.user_id
"#;

fn row_to_rating(row: &PgRow) -> Result<Rating, sqlx::Error> {
    Ok(Rating {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        store_id: row.try_get("store_id")?,
        rating: row.try_get("rating")?,
        review: row.try_get("review")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_detail(row: &PgRow) -> Result<RatingDetail, sqlx::Error> {
    Ok(RatingDetail {
        rating: row_to_rating(row)?,
        store_name: row.try_get("store_name")?,
        user_name: row.try_get("user_name")?,
    })
}

impl PostgresPersistence {
    async fn list_details(&self, filter: &str, id: i64) -> AppResult<Vec<RatingDetail>> {
        let sql = format!("{DETAIL_SELECT} WHERE {filter} = $1 ORDER BY r.created_at DESC, r.id DESC");
        let rows = sqlx::query(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .iter()
            .map(row_to_detail)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

#[async_trait]
impl RatingRepo for PostgresPersistence {
    async fn create(
        &self,
        user_id: i64,
        store_id: i64,
        rating: i32,
        review: Option<&str>,
    ) -> AppResult<Rating> {
        let sql = format!(
            r#"
            INSERT INTO ratings (user_id, store_id, rating, review)
            VALUES ($1, $2, $3, $4)
            RETURNING {RATING_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(user_id)
            .bind(store_id)
            .bind(rating)
            .bind(review)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(row_to_rating(&row)?)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Rating>> {
        let sql = format!("SELECT {RATING_COLUMNS} FROM ratings WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(row.as_ref().map(row_to_rating).transpose()?)
    }

    async fn find_by_user_and_store(
        &self,
        user_id: i64,
        store_id: i64,
    ) -> AppResult<Option<Rating>> {
        let sql =
            format!("SELECT {RATING_COLUMNS} FROM ratings WHERE user_id = $1 AND store_id = $2");
        let row = sqlx::query(&sql)
            .bind(user_id)
            .bind(store_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(row.as_ref().map(row_to_rating).transpose()?)
    }

    async fn update(&self, id: i64, rating: i32, review: Option<&str>) -> AppResult<Rating> {
        let sql = format!(
            r#"
            UPDATE ratings
            SET rating = $2, review = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {RATING_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(rating)
            .bind(review)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(row_to_rating(&row)?)
    }

    async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<RatingDetail>> {
        self.list_details("r.user_id", user_id).await
    }

    async fn list_by_store(&self, store_id: i64) -> AppResult<Vec<RatingDetail>> {
        self.list_details("r.store_id", store_id).await
    }

    async fn list_by_store_owner(&self, owner_id: i64) -> AppResult<Vec<RatingDetail>> {
        self.list_details("s.owner_id", owner_id).await
    }
}
