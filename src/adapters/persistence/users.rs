use async_trait::async_trait;
use sqlx::{Row, postgres::PgRow};

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::{
        role::Role,
        user::{User, UserActivity, UserProfile},
    },
    use_cases::auth::{NewUser, UserRepo},
};

fn row_to_user(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        password_hash: row.try_get("password_hash")?,
        role: row.try_get("role")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_activity(row: &PgRow) -> Result<UserActivity, sqlx::Error> {
    Ok(UserActivity {
        profile: UserProfile {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            role: row.try_get("role")?,
            created_at: row.try_get("created_at")?,
        },
        store_count: row.try_get("store_count")?,
        rating_count: row.try_get("rating_count")?,
    })
}

#[async_trait]
impl UserRepo for PostgresPersistence {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (email, name, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, password_hash, role, created_at
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(&new_user.password_hash)
        .bind(new_user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row_to_user(&row)?)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, name, password_hash, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.as_ref().map(row_to_user).transpose()?)
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, name, password_hash, role, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.as_ref().map(row_to_user).transpose()?)
    }

    async fn email_taken_by_other(&self, email: &str, user_id: i64) -> AppResult<bool> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id <> $2)")
                .bind(email)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::from)?;

        Ok(row.0)
    }

    async fn update_profile(
        &self,
        user_id: i64,
        name: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> AppResult<User> {
        let row = sqlx::query(
            r#"
            UPDATE users
            SET name = $2,
                email = $3,
                password_hash = COALESCE($4, password_hash)
            WHERE id = $1
            RETURNING id, email, name, password_hash, role, created_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row_to_user(&row)?)
    }

    async fn count_by_role(&self, role: Role) -> AppResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(row.0)
    }

    async fn list_non_admin_with_activity(&self) -> AppResult<Vec<UserActivity>> {
        let rows = sqlx::query(
            r#"
            SELECT
                u.id,
                u.email,
                u.name,
                u.role,
                u.created_at,
                (SELECT COUNT(*) FROM stores s WHERE s.owner_id = u.id) AS store_count,
                (SELECT COUNT(*) FROM ratings r WHERE r.user_id = u.id) AS rating_count
            FROM users u
            WHERE u.role <> $1
            ORDER BY u.created_at DESC, u.id DESC
            "#,
        )
        .bind(Role::Administrator)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(rows
            .iter()
            .map(row_to_activity)
            .collect::<Result<Vec<_>, _>>()?)
    }
}
