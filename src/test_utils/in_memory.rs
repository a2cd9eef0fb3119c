//! In-memory stand-in for `PostgresPersistence`.
//!
//! Mirrors the joins, aggregates and unique constraints of the SQL adapters
//! closely enough for use case and HTTP tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::{
        analytics::{AnalyticsRepo, PlatformTotals},
        auth::{NewUser, UserRepo},
        rating::RatingRepo,
        store::StoreRepo,
    },
    domain::entities::{
        rating::{Rating, RatingDetail},
        role::Role,
        store::{Store, StoreInput, StoreSummary},
        user::{User, UserActivity, UserProfile},
    },
};

#[derive(Default)]
pub struct InMemoryPersistence {
    pub users: Mutex<Vec<User>>,
    pub stores: Mutex<Vec<Store>>,
    pub ratings: Mutex<Vec<Rating>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
            ..Self::default()
        }
    }

    pub fn with_stores(self, stores: Vec<Store>) -> Self {
        *self.stores.lock().unwrap() = stores;
        self
    }

    pub fn with_ratings(self, ratings: Vec<Rating>) -> Self {
        *self.ratings.lock().unwrap() = ratings;
        self
    }

    fn summarize(&self, store: &Store) -> Option<StoreSummary> {
        let users = self.users.lock().unwrap();
        let owner = users.iter().find(|u| u.id == store.owner_id)?;
        let ratings = self.ratings.lock().unwrap();
        let values: Vec<i32> = ratings
            .iter()
            .filter(|r| r.store_id == store.id)
            .map(|r| r.rating)
            .collect();
        let avg_rating = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<i32>() as f64 / values.len() as f64
        };
        Some(StoreSummary {
            store: store.clone(),
            owner_name: owner.name.clone(),
            owner_email: Some(owner.email.clone()),
            avg_rating,
            review_count: values.len() as i64,
        })
    }

    fn summaries(&self, keep: impl Fn(&Store) -> bool) -> Vec<StoreSummary> {
        let mut stores: Vec<Store> = self
            .stores
            .lock()
            .unwrap()
            .iter()
            .filter(|s| keep(*s))
            .cloned()
            .collect();
        stores.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        stores.iter().filter_map(|s| self.summarize(s)).collect()
    }

    fn details(&self, keep: impl Fn(&Rating, &Store) -> bool) -> Vec<RatingDetail> {
        let users = self.users.lock().unwrap();
        let stores = self.stores.lock().unwrap();
        let mut ratings: Vec<Rating> = self.ratings.lock().unwrap().clone();
        ratings.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        ratings
            .into_iter()
            .filter_map(|rating| {
                let store = stores.iter().find(|s| s.id == rating.store_id)?;
                let user = users.iter().find(|u| u.id == rating.user_id)?;
                keep(&rating, store).then(|| RatingDetail {
                    store_name: store.name.clone(),
                    user_name: user.name.clone(),
                    rating,
                })
            })
            .collect()
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[async_trait]
impl UserRepo for InMemoryPersistence {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::Conflict(
                "User with this email already exists".into(),
            ));
        }
        let user = User {
            id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            email: new_user.email,
            name: new_user.name,
            password_hash: new_user.password_hash,
            role: new_user.role,
            created_at: now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn email_taken_by_other(&self, email: &str, user_id: i64) -> AppResult<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.email == email && u.id != user_id))
    }

    async fn update_profile(
        &self,
        user_id: i64,
        name: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(AppError::NotFound)?;
        user.name = name.to_string();
        user.email = email.to_string();
        if let Some(hash) = password_hash {
            user.password_hash = hash.to_string();
        }
        Ok(user.clone())
    }

    async fn count_by_role(&self, role: Role) -> AppResult<i64> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.role == role)
            .count() as i64)
    }

    async fn list_non_admin_with_activity(&self) -> AppResult<Vec<UserActivity>> {
        let mut users: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.role != Role::Administrator)
            .cloned()
            .collect();
        users.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        let stores = self.stores.lock().unwrap();
        let ratings = self.ratings.lock().unwrap();
        Ok(users
            .iter()
            .map(|user| UserActivity {
                profile: UserProfile::from(user),
                store_count: stores.iter().filter(|s| s.owner_id == user.id).count() as i64,
                rating_count: ratings.iter().filter(|r| r.user_id == user.id).count() as i64,
            })
            .collect())
    }
}

#[async_trait]
impl StoreRepo for InMemoryPersistence {
    async fn create(&self, owner_id: i64, input: &StoreInput) -> AppResult<Store> {
        let mut stores = self.stores.lock().unwrap();
        let store = Store {
            id: stores.iter().map(|s| s.id).max().unwrap_or(0) + 1,
            owner_id,
            name: input.name.clone(),
            description: input.description.clone(),
            address: input.address.clone(),
            phone: input.phone.clone(),
            email: input.email.clone(),
            website: input.website.clone(),
            created_at: now(),
            updated_at: now(),
        };
        stores.push(store.clone());
        Ok(store)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Store>> {
        Ok(self.stores.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn update(&self, id: i64, input: &StoreInput) -> AppResult<Store> {
        let mut stores = self.stores.lock().unwrap();
        let store = stores
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(AppError::NotFound)?;
        store.name = input.name.clone();
        store.description = input.description.clone();
        store.address = input.address.clone();
        store.phone = input.phone.clone();
        store.email = input.email.clone();
        store.website = input.website.clone();
        store.updated_at = now();
        Ok(store.clone())
    }

    async fn list_summaries(&self) -> AppResult<Vec<StoreSummary>> {
        Ok(self.summaries(|_| true))
    }

    async fn list_summaries_by_owner(&self, owner_id: i64) -> AppResult<Vec<StoreSummary>> {
        Ok(self.summaries(|s| s.owner_id == owner_id))
    }

    async fn get_summary(&self, id: i64) -> AppResult<Option<StoreSummary>> {
        Ok(self.summaries(|s| s.id == id).into_iter().next())
    }
}

#[async_trait]
impl RatingRepo for InMemoryPersistence {
    async fn create(
        &self,
        user_id: i64,
        store_id: i64,
        rating: i32,
        review: Option<&str>,
    ) -> AppResult<Rating> {
        if !self.stores.lock().unwrap().iter().any(|s| s.id == store_id) {
            return Err(AppError::InvalidInput("Referenced record not found".into()));
        }
        let mut ratings = self.ratings.lock().unwrap();
        if ratings
            .iter()
            .any(|r| r.user_id == user_id && r.store_id == store_id)
        {
            return Err(AppError::Conflict(
                "You have already rated this store".into(),
            ));
        }
        let created = Rating {
            id: ratings.iter().map(|r| r.id).max().unwrap_or(0) + 1,
            user_id,
            store_id,
            rating,
            review: review.map(str::to_string),
            created_at: now(),
            updated_at: now(),
        };
        ratings.push(created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Rating>> {
        Ok(self.ratings.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_user_and_store(
        &self,
        user_id: i64,
        store_id: i64,
    ) -> AppResult<Option<Rating>> {
        Ok(self
            .ratings
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id == user_id && r.store_id == store_id)
            .cloned())
    }

    async fn update(&self, id: i64, rating: i32, review: Option<&str>) -> AppResult<Rating> {
        let mut ratings = self.ratings.lock().unwrap();
        let existing = ratings
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(AppError::NotFound)?;
        existing.rating = rating;
        existing.review = review.map(str::to_string);
        existing.updated_at = now();
        Ok(existing.clone())
    }

    async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<RatingDetail>> {
        Ok(self.details(|r, _| r.user_id == user_id))
    }

    async fn list_by_store(&self, store_id: i64) -> AppResult<Vec<RatingDetail>> {
        Ok(self.details(|r, _| r.store_id == store_id))
    }

    async fn list_by_store_owner(&self, owner_id: i64) -> AppResult<Vec<RatingDetail>> {
        Ok(self.details(|_, s| s.owner_id == owner_id))
    }
}

#[async_trait]
impl AnalyticsRepo for InMemoryPersistence {
    async fn platform_totals(&self, since: NaiveDateTime) -> AppResult<PlatformTotals> {
        let users = self.users.lock().unwrap();
        let stores = self.stores.lock().unwrap();
        let ratings = self.ratings.lock().unwrap();
        let count_role = |role: Role| users.iter().filter(|u| u.role == role).count() as i64;
        let average_rating = if ratings.is_empty() {
            0.0
        } else {
            ratings.iter().map(|r| r.rating).sum::<i32>() as f64 / ratings.len() as f64
        };

        Ok(PlatformTotals {
            total_users: users.len() as i64,
            customers: count_role(Role::Customer),
            store_owners: count_role(Role::StoreOwner),
            total_stores: stores.len() as i64,
            total_ratings: ratings.len() as i64,
            average_rating,
            new_users: users.iter().filter(|u| u.created_at >= since).count() as i64,
            new_stores: stores.iter().filter(|s| s.created_at >= since).count() as i64,
            new_ratings: ratings.iter().filter(|r| r.created_at >= since).count() as i64,
        })
    }

    async fn rating_counts(&self) -> AppResult<Vec<(i32, i64)>> {
        let ratings = self.ratings.lock().unwrap();
        let mut counts: Vec<(i32, i64)> = Vec::new();
        for rating in ratings.iter() {
            match counts.iter_mut().find(|(stars, _)| *stars == rating.rating) {
                Some((_, count)) => *count += 1,
                None => counts.push((rating.rating, 1)),
            }
        }
        Ok(counts)
    }
}
