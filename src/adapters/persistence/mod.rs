use sqlx::PgPool;

use crate::app_error::AppError;

pub mod analytics;
pub mod ratings;
pub mod stores;
pub mod users;

#[derive(Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    pub fn new(pool: PgPool) -> Self {
        PostgresPersistence { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const USERS_EMAIL_KEY: &str = "users_email_key";
const RATINGS_USER_STORE_KEY: &str = "ratings_user_id_store_id_key";

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                match db_err.constraint() {
                    Some(USERS_EMAIL_KEY) => {
                        AppError::Conflict("User with this email already exists".into())
                    }
                    Some(RATINGS_USER_STORE_KEY) => {
                        AppError::Conflict("You have already rated this store".into())
                    }
                    _ => AppError::Conflict("A record with this value already exists".into()),
                }
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::InvalidInput("Referenced record not found".into())
            }
            sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
                AppError::InvalidInput("Value is out of range".into())
            }
            _ => {
                // Details stay in the log.
                tracing::error!(error = ?err, "Database error");
                AppError::Database("Database operation failed".into())
            }
        }
    }
}
