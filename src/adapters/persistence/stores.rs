use async_trait::async_trait;
use sqlx::{Row, postgres::PgRow};

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::store::{Store, StoreInput, StoreSummary},
    use_cases::store::StoreRepo,
};

const STORE_COLUMNS: &str = "id, owner_id, name, description, address, phone, email, website, created_at, updated_at";

// Aggregates are computed per query; nothing is denormalized onto `stores`.
const SUMMARY_SELECT: &str = r#"
    SELECT
        s.id, s.owner_id, s.name, s.description, s.address, s.phone, s.email, s.website,
        s.created_at, s.updated_at,
        u.name AS owner_name,
        u.email AS owner_email,
        COALESCE(AVG(r.rating)::float8, 0) AS avg_rating,
        COUNT(r.id) AS review_count
    FROM stores s
    JOIN users u ON u.id = s.owner_id
    LEFT JOIN ratings r ON r.store_id = s.id
"#;

const SUMMARY_GROUP: &str = "GROUP BY s.id, u.name, u.email";

fn row_to_store(row: &PgRow) -> Result<Store, sqlx::Error> {
    Ok(Store {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        address: row.try_get("address")?,
        phone: row.try_get("phone")?,
        email: row.try_get("email")?,
        website: row.try_get("website")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_summary(row: &PgRow) -> Result<StoreSummary, sqlx::Error> {
    Ok(StoreSummary {
        store: row_to_store(row)?,
        owner_name: row.try_get("owner_name")?,
        owner_email: row.try_get("owner_email")?,
        avg_rating: row.try_get("avg_rating")?,
        review_count: row.try_get("review_count")?,
    })
}

#[async_trait]
impl StoreRepo for PostgresPersistence {
    async fn create(&self, owner_id: i64, input: &StoreInput) -> AppResult<Store> {
        let sql = format!(
            r#"
            INSERT INTO stores (owner_id, name, description, address, phone, email, website)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {STORE_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.address)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.website)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(row_to_store(&row)?)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Store>> {
        let sql = format!("SELECT {STORE_COLUMNS} FROM stores WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(row.as_ref().map(row_to_store).transpose()?)
    }

    async fn update(&self, id: i64, input: &StoreInput) -> AppResult<Store> {
        let sql = format!(
            r#"
            UPDATE stores
            SET name = $2,
                description = $3,
                address = $4,
                phone = $5,
                email = $6,
                website = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {STORE_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.address)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.website)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(row_to_store(&row)?)
    }

    async fn list_summaries(&self) -> AppResult<Vec<StoreSummary>> {
        let sql = format!("{SUMMARY_SELECT} {SUMMARY_GROUP} ORDER BY s.created_at DESC, s.id DESC");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .iter()
            .map(row_to_summary)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn list_summaries_by_owner(&self, owner_id: i64) -> AppResult<Vec<StoreSummary>> {
        let sql = format!(
            "{SUMMARY_SELECT} WHERE s.owner_id = $1 {SUMMARY_GROUP} ORDER BY s.created_at DESC, s.id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .iter()
            .map(row_to_summary)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn get_summary(&self, id: i64) -> AppResult<Option<StoreSummary>> {
        let sql = format!("{SUMMARY_SELECT} WHERE s.id = $1 {SUMMARY_GROUP}");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(row.as_ref().map(row_to_summary).transpose()?)
    }
}
