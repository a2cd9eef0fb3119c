use bcrypt::{DEFAULT_COST, hash, verify};

use crate::app_error::{AppError, AppResult};

#[cfg(not(test))]
const HASH_COST: u32 = DEFAULT_COST;
// Minimum bcrypt cost keeps the test suite fast.
#[cfg(test)]
const HASH_COST: u32 = 4;

pub fn hash_password(password: &str) -> AppResult<String> {
    if password.is_empty() {
        return Err(AppError::InvalidInput("Password cannot be empty".into()));
    }
    hash(password, HASH_COST).map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// False for empty input or an unparseable hash, never an error.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    if password.is_empty() || password_hash.is_empty() {
        return false;
    }
    verify(password, password_hash).unwrap_or(false)
}

/// `hash_password` on tokio's blocking pool.
pub async fn spawn_hash_password(password: &str) -> AppResult<String> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {e}")))?
}

/// `verify_password` on tokio's blocking pool.
pub async fn spawn_verify_password(password: &str, password_hash: &str) -> bool {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    match tokio::task::spawn_blocking(move || verify_password(&password, &password_hash)).await {
        Ok(matches) => matches,
        Err(err) => {
            tracing::error!(error = %err, "password verification task failed");
            false
        }
    }
}
