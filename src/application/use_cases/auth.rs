use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        password::{spawn_hash_password, spawn_verify_password},
        token::TokenCodec,
        validators::{is_valid_email, is_valid_name, is_valid_password, normalize_email},
    },
    domain::entities::{
        role::Role,
        user::{User, UserActivity, UserProfile},
    },
};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn create(&self, new_user: NewUser) -> AppResult<User>;
    async fn get_by_id(&self, id: i64) -> AppResult<Option<User>>;
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn email_taken_by_other(&self, email: &str, user_id: i64) -> AppResult<bool>;
    async fn update_profile(
        &self,
        user_id: i64,
        name: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> AppResult<User>;
    async fn count_by_role(&self, role: Role) -> AppResult<i64>;
    async fn list_non_admin_with_activity(&self) -> AppResult<Vec<UserActivity>>;
}

/// Successful login: the session token to set and where to send the user.
#[derive(Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub user: UserProfile,
    pub redirect: &'static str,
}

#[derive(Clone)]
pub struct AuthUseCases {
    users: Arc<dyn UserRepo>,
    codec: Arc<TokenCodec>,
}

impl AuthUseCases {
    pub fn new(users: Arc<dyn UserRepo>, codec: Arc<TokenCodec>) -> Self {
        Self { users, codec }
    }

    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> AppResult<UserProfile> {
        let role = role.unwrap_or_default();
        if !role.is_self_assignable() {
            return Err(AppError::InvalidInput(
                "Role must be 'normal_user' or 'store_owner'".into(),
            ));
        }
        if !is_valid_name(name) {
            return Err(AppError::InvalidInput(
                "Name must be between 1 and 60 characters".into(),
            ));
        }
        if !is_valid_email(email) {
            return Err(AppError::InvalidInput("Invalid email address".into()));
        }
        if !is_valid_password(password) {
            return Err(AppError::InvalidInput(
                "Password must be at least 8 characters long".into(),
            ));
        }

        let user = self
            .users
            .create(NewUser {
                email: normalize_email(email),
                name: name.trim().to_string(),
                password_hash: spawn_hash_password(password).await?,
                role,
            })
            .await?;

        tracing::info!(user_id = user.id, role = %user.role, "user registered");
        Ok(UserProfile::from(&user))
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginOutcome> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(
                "Email and password are required".into(),
            ));
        }

        let Some(user) = self.users.get_by_email(&normalize_email(email)).await? else {
            return Err(AppError::InvalidCredentials);
        };
        if !spawn_verify_password(password, &user.password_hash).await {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.codec.issue(&user.claim())?;
        tracing::info!(user_id = user.id, role = %user.role, "login succeeded");

        Ok(LoginOutcome {
            token,
            redirect: user.role.landing_path(),
            user: UserProfile::from(&user),
        })
    }

    /// Creates the first administrator. No-op once any administrator exists.
    #[instrument(skip(self, password))]
    pub async fn bootstrap_admin(&self, email: &str, password: &str) -> AppResult<bool> {
        if self.users.count_by_role(Role::Administrator).await? > 0 {
            return Ok(false);
        }
        if !is_valid_email(email) || !is_valid_password(password) {
            return Err(AppError::InvalidInput(
                "Bootstrap administrator needs a valid email and a password of at least 8 characters"
                    .into(),
            ));
        }

        let admin = self
            .users
            .create(NewUser {
                email: normalize_email(email),
                name: "Admin".into(),
                password_hash: spawn_hash_password(password).await?,
                role: Role::Administrator,
            })
            .await?;

        tracing::warn!(user_id = admin.id, "bootstrapped administrator account");
        Ok(true)
    }
}
