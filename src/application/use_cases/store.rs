use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::instrument;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        use_cases::{rating::RatingRepo, require_owner, require_role},
        validators::non_blank,
    },
    domain::entities::{
        identity::IdentityClaim,
        rating::RatingDetail,
        role::Role,
        store::{Store, StoreInput, StoreSummary},
    },
};

#[async_trait]
pub trait StoreRepo: Send + Sync {
    async fn create(&self, owner_id: i64, input: &StoreInput) -> AppResult<Store>;
    async fn get_by_id(&self, id: i64) -> AppResult<Option<Store>>;
    async fn update(&self, id: i64, input: &StoreInput) -> AppResult<Store>;
    /// Newest first.
    async fn list_summaries(&self) -> AppResult<Vec<StoreSummary>>;
    async fn list_summaries_by_owner(&self, owner_id: i64) -> AppResult<Vec<StoreSummary>>;
    async fn get_summary(&self, id: i64) -> AppResult<Option<StoreSummary>>;
}

#[derive(Debug, Serialize)]
pub struct StoreDetail {
    pub store: StoreSummary,
    pub reviews: Vec<RatingDetail>,
}

#[derive(Clone)]
pub struct StoreUseCases {
    stores: Arc<dyn StoreRepo>,
    ratings: Arc<dyn RatingRepo>,
}

impl StoreUseCases {
    pub fn new(stores: Arc<dyn StoreRepo>, ratings: Arc<dyn RatingRepo>) -> Self {
        Self { stores, ratings }
    }

    #[instrument(skip(self, input), fields(subject = claim.id))]
    pub async fn create_store(&self, claim: &IdentityClaim, input: StoreInput) -> AppResult<Store> {
        require_role(claim, Role::StoreOwner)?;
        let input = validate_store_input(input)?;
        let store = self.stores.create(claim.id, &input).await?;
        tracing::info!(store_id = store.id, "store created");
        Ok(store)
    }

    #[instrument(skip(self, input), fields(subject = claim.id))]
    pub async fn update_store(
        &self,
        claim: &IdentityClaim,
        store_id: i64,
        input: StoreInput,
    ) -> AppResult<Store> {
        require_role(claim, Role::StoreOwner)?;
        let input = validate_store_input(input)?;

        let existing = self
            .stores
            .get_by_id(store_id)
            .await?
            .ok_or(AppError::NotFound)?;
        require_owner(claim, existing.owner_id)?;

        self.stores.update(store_id, &input).await
    }

    #[instrument(skip(self))]
    pub async fn list_stores(&self) -> AppResult<Vec<StoreSummary>> {
        let stores = self.stores.list_summaries().await?;
        Ok(stores.into_iter().map(StoreSummary::public).collect())
    }

    #[instrument(skip(self))]
    pub async fn store_detail(&self, store_id: i64) -> AppResult<StoreDetail> {
        let store = self
            .stores
            .get_summary(store_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let reviews = self.ratings.list_by_store(store_id).await?;
        Ok(StoreDetail {
            store: store.public(),
            reviews,
        })
    }

    #[instrument(skip(self), fields(subject = claim.id))]
    pub async fn owner_stores(&self, claim: &IdentityClaim) -> AppResult<Vec<StoreSummary>> {
        require_role(claim, Role::StoreOwner)?;
        self.stores.list_summaries_by_owner(claim.id).await
    }

    #[instrument(skip(self), fields(subject = claim.id))]
    pub async fn owner_reviews(&self, claim: &IdentityClaim) -> AppResult<Vec<RatingDetail>> {
        require_role(claim, Role::StoreOwner)?;
        self.ratings.list_by_store_owner(claim.id).await
    }

    /// Every store with owner contact details, for administrators.
    #[instrument(skip(self), fields(subject = claim.id))]
    pub async fn admin_stores(&self, claim: &IdentityClaim) -> AppResult<Vec<StoreSummary>> {
        require_role(claim, Role::Administrator)?;
        self.stores.list_summaries().await
    }
}

fn validate_store_input(input: StoreInput) -> AppResult<StoreInput> {
    let name = input.name.trim().to_string();
    let address = input.address.trim().to_string();
    if name.is_empty() || address.is_empty() {
        return Err(AppError::InvalidInput(
            "Name and address are required".into(),
        ));
    }
    Ok(StoreInput {
        name,
        address,
        description: non_blank(input.description),
        phone: non_blank(input.phone),
        email: non_blank(input.email),
        website: non_blank(input.website),
    })
}
