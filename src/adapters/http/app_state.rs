use std::sync::Arc;

use crate::{
    application::{route_policy::RoutePolicy, token::TokenCodec},
    infra::config::AppConfig,
    use_cases::{
        analytics::AnalyticsUseCases, auth::AuthUseCases, profile::ProfileUseCases,
        rating::RatingUseCases, store::StoreUseCases,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub token_codec: Arc<TokenCodec>,
    pub route_policy: Arc<RoutePolicy>,
    pub auth_use_cases: Arc<AuthUseCases>,
    pub profile_use_cases: Arc<ProfileUseCases>,
    pub store_use_cases: Arc<StoreUseCases>,
    pub rating_use_cases: Arc<RatingUseCases>,
    pub analytics_use_cases: Arc<AnalyticsUseCases>,
}
