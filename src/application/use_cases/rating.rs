use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        use_cases::{require_owner, require_role, store::StoreRepo},
        validators::{is_valid_rating, non_blank},
    },
    domain::entities::{
        identity::IdentityClaim,
        rating::{Rating, RatingDetail},
        role::Role,
    },
};

#[async_trait]
pub trait RatingRepo: Send + Sync {
    /// Fails with `Conflict` when the user already rated the store.
    async fn create(
        &self,
        user_id: i64,
        store_id: i64,
        rating: i32,
        review: Option<&str>,
    ) -> AppResult<Rating>;
    async fn get_by_id(&self, id: i64) -> AppResult<Option<Rating>>;
    async fn find_by_user_and_store(&self, user_id: i64, store_id: i64)
    -> AppResult<Option<Rating>>;
    async fn update(&self, id: i64, rating: i32, review: Option<&str>) -> AppResult<Rating>;
    async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<RatingDetail>>;
    async fn list_by_store(&self, store_id: i64) -> AppResult<Vec<RatingDetail>>;
    /// Ratings received by every store the owner has.
    async fn list_by_store_owner(&self, owner_id: i64) -> AppResult<Vec<RatingDetail>>;
}

#[derive(Clone)]
pub struct RatingUseCases {
    ratings: Arc<dyn RatingRepo>,
    stores: Arc<dyn StoreRepo>,
}

impl RatingUseCases {
    pub fn new(ratings: Arc<dyn RatingRepo>, stores: Arc<dyn StoreRepo>) -> Self {
        Self { ratings, stores }
    }

    #[instrument(skip(self, review), fields(subject = claim.id))]
    pub async fn submit_rating(
        &self,
        claim: &IdentityClaim,
        store_id: i64,
        rating: i32,
        review: Option<String>,
    ) -> AppResult<Rating> {
        require_role(claim, Role::Customer)?;
        if store_id <= 0 || !is_valid_rating(rating) {
            return Err(AppError::InvalidInput(
                "Valid store ID and rating (1-5) are required".into(),
            ));
        }

        if self.stores.get_by_id(store_id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        if self
            .ratings
            .find_by_user_and_store(claim.id, store_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "You have already rated this store".into(),
            ));
        }

        let review = non_blank(review);
        let created = self
            .ratings
            .create(claim.id, store_id, rating, review.as_deref())
            .await?;
        tracing::info!(rating_id = created.id, store_id, "rating submitted");
        Ok(created)
    }

    #[instrument(skip(self, review), fields(subject = claim.id))]
    pub async fn update_rating(
        &self,
        claim: &IdentityClaim,
        rating_id: i64,
        rating: i32,
        review: Option<String>,
    ) -> AppResult<Rating> {
        require_role(claim, Role::Customer)?;
        if !is_valid_rating(rating) {
            return Err(AppError::InvalidInput(
                "Valid rating (1-5) is required".into(),
            ));
        }

        let existing = self
            .ratings
            .get_by_id(rating_id)
            .await?
            .ok_or(AppError::NotFound)?;
        require_owner(claim, existing.user_id)?;

        let review = non_blank(review);
        self.ratings
            .update(rating_id, rating, review.as_deref())
            .await
    }

    /// The caller's existing rating of a store, if any.
    #[instrument(skip(self), fields(subject = claim.id))]
    pub async fn my_rating_for_store(
        &self,
        claim: &IdentityClaim,
        store_id: i64,
    ) -> AppResult<Option<Rating>> {
        require_role(claim, Role::Customer)?;
        self.ratings.find_by_user_and_store(claim.id, store_id).await
    }

    #[instrument(skip(self), fields(subject = claim.id))]
    pub async fn my_ratings(&self, claim: &IdentityClaim) -> AppResult<Vec<RatingDetail>> {
        require_role(claim, Role::Customer)?;
        self.ratings.list_by_user(claim.id).await
    }
}
