use std::{fs::File, sync::Arc};

use secrecy::ExposeSecret;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::http::app_state::AppState,
    application::{route_policy::RoutePolicy, token::TokenCodec},
    infra::{config::AppConfig, error::InfraError, postgres_persistence},
    use_cases::{
        analytics::{AnalyticsRepo, AnalyticsUseCases},
        auth::{AuthUseCases, UserRepo},
        profile::ProfileUseCases,
        rating::{RatingRepo, RatingUseCases},
        store::{StoreRepo, StoreUseCases},
    },
};

pub async fn init_app_state() -> Result<AppState, InfraError> {
    let config = AppConfig::from_env()?;
    let persistence = Arc::new(postgres_persistence(&config).await?);

    let app_state = assemble_state(config, persistence);
    bootstrap_admin(&app_state).await?;

    Ok(app_state)
}

/// Wires use cases over one persistence backend that serves every port.
pub fn assemble_state<P>(config: AppConfig, persistence: Arc<P>) -> AppState
where
    P: UserRepo + StoreRepo + RatingRepo + AnalyticsRepo + 'static,
{
    let token_codec = Arc::new(TokenCodec::new(
        config.session_secret.clone(),
        config.session_ttl,
    ));

    let users = persistence.clone() as Arc<dyn UserRepo>;
    let stores = persistence.clone() as Arc<dyn StoreRepo>;
    let ratings = persistence.clone() as Arc<dyn RatingRepo>;
    let analytics = persistence as Arc<dyn AnalyticsRepo>;

    AppState {
        config: Arc::new(config),
        token_codec: token_codec.clone(),
        route_policy: Arc::new(RoutePolicy::standard()),
        auth_use_cases: Arc::new(AuthUseCases::new(users.clone(), token_codec)),
        profile_use_cases: Arc::new(ProfileUseCases::new(users.clone())),
        store_use_cases: Arc::new(StoreUseCases::new(stores.clone(), ratings.clone())),
        rating_use_cases: Arc::new(RatingUseCases::new(ratings, stores)),
        analytics_use_cases: Arc::new(AnalyticsUseCases::new(analytics, users)),
    }
}

async fn bootstrap_admin(app_state: &AppState) -> Result<(), InfraError> {
    let Some(admin) = &app_state.config.bootstrap_admin else {
        return Ok(());
    };

    let created = app_state
        .auth_use_cases
        .bootstrap_admin(&admin.email, admin.password.expose_secret())
        .await
        .map_err(InfraError::Bootstrap)?;

    if created {
        tracing::info!(email = %admin.email, "bootstrap administrator created");
    } else {
        tracing::debug!("administrator already present, bootstrap skipped");
    }
    Ok(())
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "store_ratings=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer().with_target(false).with_level(true).pretty();

    // File (structured JSON logs), skipped when the file cannot be created
    let json_layer = File::create("app.log").ok().map(|file| {
        fmt::layer()
            .json()
            .with_writer(file)
            .with_current_span(true)
            .with_span_list(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
