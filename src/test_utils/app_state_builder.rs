use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};

use axum::http::HeaderValue;
use secrecy::SecretString;

use crate::{
    adapters::http::{app_state::AppState, session::SESSION_COOKIE},
    application::token::DEFAULT_SESSION_TTL,
    domain::entities::{rating::Rating, store::Store, user::User},
    infra::{config::AppConfig, setup::assemble_state},
    test_utils::{InMemoryPersistence, TEST_SESSION_SECRET, test_codec},
};

pub fn test_config() -> AppConfig {
    AppConfig {
        session_secret: SecretString::new(TEST_SESSION_SECRET.into()),
        session_ttl: DEFAULT_SESSION_TTL,
        cookie_secure: false,
        database_url: String::new(),
        database_max_connections: 1,
        bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
        bootstrap_admin: None,
    }
}

/// Cookie header carrying a valid session for `user`.
pub fn session_header(user: &User) -> HeaderValue {
    let token = test_codec().issue(&user.claim()).unwrap();
    HeaderValue::from_str(&format!("{SESSION_COOKIE}={token}")).unwrap()
}

/// Builds an `AppState` over in-memory repositories.
pub struct TestAppStateBuilder {
    persistence: InMemoryPersistence,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            persistence: InMemoryPersistence::new(),
        }
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        *self.persistence.users.lock().unwrap() = users;
        self
    }

    pub fn with_stores(mut self, stores: Vec<Store>) -> Self {
        self.persistence = self.persistence.with_stores(stores);
        self
    }

    pub fn with_ratings(mut self, ratings: Vec<Rating>) -> Self {
        self.persistence = self.persistence.with_ratings(ratings);
        self
    }

    pub fn build(self) -> AppState {
        assemble_state(test_config(), Arc::new(self.persistence))
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
