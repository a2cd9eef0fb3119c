use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use crate::{
    app_error::AppResult,
    application::use_cases::{auth::UserRepo, require_role},
    domain::entities::{
        identity::IdentityClaim,
        rating::{MAX_RATING, MIN_RATING},
        role::Role,
        user::UserActivity,
    },
};

const RECENT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlatformTotals {
    pub total_users: i64,
    pub customers: i64,
    pub store_owners: i64,
    pub total_stores: i64,
    pub total_ratings: i64,
    /// 0.0 when nothing has been rated.
    pub average_rating: f64,
    pub new_users: i64,
    pub new_stores: i64,
    pub new_ratings: i64,
}

#[async_trait]
pub trait AnalyticsRepo: Send + Sync {
    /// `new_*` fields count rows created at or after `since`.
    async fn platform_totals(&self, since: NaiveDateTime) -> AppResult<PlatformTotals>;
    /// `(stars, count)` for every star value that has at least one rating.
    async fn rating_counts(&self) -> AppResult<Vec<(i32, i64)>>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingBucket {
    pub rating: i32,
    pub count: i64,
    /// Share of all ratings, rounded to one decimal.
    pub percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct PlatformOverview {
    #[serde(flatten)]
    pub totals: PlatformTotals,
    pub rating_distribution: Vec<RatingBucket>,
}

#[derive(Clone)]
pub struct AnalyticsUseCases {
    analytics: Arc<dyn AnalyticsRepo>,
    users: Arc<dyn UserRepo>,
}

impl AnalyticsUseCases {
    pub fn new(analytics: Arc<dyn AnalyticsRepo>, users: Arc<dyn UserRepo>) -> Self {
        Self { analytics, users }
    }

    #[instrument(skip(self), fields(subject = claim.id))]
    pub async fn overview(&self, claim: &IdentityClaim) -> AppResult<PlatformOverview> {
        require_role(claim, Role::Administrator)?;
        let since = Utc::now().naive_utc() - Duration::days(RECENT_WINDOW_DAYS);
        let totals = self.analytics.platform_totals(since).await?;
        let counts = self.analytics.rating_counts().await?;
        Ok(PlatformOverview {
            totals,
            rating_distribution: distribution(&counts),
        })
    }

    #[instrument(skip(self), fields(subject = claim.id))]
    pub async fn users(&self, claim: &IdentityClaim) -> AppResult<Vec<UserActivity>> {
        require_role(claim, Role::Administrator)?;
        self.users.list_non_admin_with_activity().await
    }
}

/// One bucket per star value, highest first, including empty ones.
fn distribution(counts: &[(i32, i64)]) -> Vec<RatingBucket> {
    let total: i64 = counts.iter().map(|(_, count)| count).sum();
    (MIN_RATING..=MAX_RATING)
        .rev()
        .map(|rating| {
            let count = counts
                .iter()
                .find(|(stars, _)| *stars == rating)
                .map(|(_, count)| *count)
                .unwrap_or(0);
            let percentage = if total > 0 {
                (count as f64 * 1000.0 / total as f64).round() / 10.0
            } else {
                0.0
            };
            RatingBucket {
                rating,
                count,
                percentage,
            }
        })
        .collect()
}
