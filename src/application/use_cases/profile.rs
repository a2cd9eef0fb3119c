use std::sync::Arc;

use tracing::instrument;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        password::{spawn_hash_password, spawn_verify_password},
        use_cases::auth::UserRepo,
        validators::{is_valid_email, is_valid_name, is_valid_password, normalize_email},
    },
    domain::entities::{identity::IdentityClaim, user::UserProfile},
};

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Clone)]
pub struct ProfileUseCases {
    users: Arc<dyn UserRepo>,
}

impl ProfileUseCases {
    pub fn new(users: Arc<dyn UserRepo>) -> Self {
        Self { users }
    }

    #[instrument(skip(self), fields(subject = claim.id))]
    pub async fn get_profile(&self, claim: &IdentityClaim) -> AppResult<UserProfile> {
        let user = self
            .users
            .get_by_id(claim.id)
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(UserProfile::from(&user))
    }

    /// Updates name and email, and the password when a new one is given.
    /// A session issued before the update keeps its old claim until re-login.
    #[instrument(skip(self, update), fields(subject = claim.id))]
    pub async fn update_profile(
        &self,
        claim: &IdentityClaim,
        update: ProfileUpdate,
    ) -> AppResult<UserProfile> {
        if update.name.trim().is_empty() || update.email.trim().is_empty() {
            return Err(AppError::InvalidInput("Name and email are required".into()));
        }
        if !is_valid_name(&update.name) {
            return Err(AppError::InvalidInput(
                "Name must be between 1 and 60 characters".into(),
            ));
        }
        if !is_valid_email(&update.email) {
            return Err(AppError::InvalidInput("Invalid email address".into()));
        }

        let email = normalize_email(&update.email);
        if self.users.email_taken_by_other(&email, claim.id).await? {
            return Err(AppError::Conflict("Email is already taken".into()));
        }

        let new_hash = match update.new_password.as_deref().filter(|p| !p.is_empty()) {
            None => None,
            Some(new_password) => {
                let Some(current) = update.current_password.as_deref().filter(|p| !p.is_empty())
                else {
                    return Err(AppError::InvalidInput(
                        "Current password is required".into(),
                    ));
                };
                let user = self
                    .users
                    .get_by_id(claim.id)
                    .await?
                    .ok_or(AppError::NotFound)?;
                if !spawn_verify_password(current, &user.password_hash).await {
                    return Err(AppError::InvalidInput(
                        "Current password is incorrect".into(),
                    ));
                }
                if !is_valid_password(new_password) {
                    return Err(AppError::InvalidInput(
                        "Password must be at least 8 characters long".into(),
                    ));
                }
                Some(spawn_hash_password(new_password).await?)
            }
        };

        let user = self
            .users
            .update_profile(claim.id, update.name.trim(), &email, new_hash.as_deref())
            .await?;
        Ok(UserProfile::from(&user))
    }
}
