use std::net::{Ipv4Addr, SocketAddr};

use axum::http::HeaderValue;
use env_helpers::get_env_default;
use secrecy::SecretString;
use time::Duration;

use crate::infra::error::InfraError;

/// Credentials for the first administrator, created at startup when no
/// administrator exists yet.
pub struct BootstrapAdmin {
    pub email: String,
    pub password: SecretString,
}

pub struct AppConfig {
    pub session_secret: SecretString,
    /// Token validity window, also used as the cookie max-age.
    pub session_ttl: Duration,
    /// Must be true in production so the session cookie is never sent over plain HTTP.
    pub cookie_secure: bool,
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

fn optional(var: &'static str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn required(var: &'static str) -> Result<String, InfraError> {
    optional(var).ok_or(InfraError::ConfigMissing { var })
}

impl AppConfig {
    pub fn from_env() -> Result<Self, InfraError> {
        let session_secret = SecretString::new(required("SESSION_SECRET")?.into());
        let session_ttl_days: i64 = get_env_default("SESSION_TTL_DAYS", 7);
        if session_ttl_days <= 0 {
            return Err(InfraError::ConfigInvalid {
                var: "SESSION_TTL_DAYS",
            });
        }
        let cookie_secure: bool = get_env_default("COOKIE_SECURE", false);

        let database_url = required("DATABASE_URL")?;
        let database_max_connections: u32 = get_env_default("DATABASE_MAX_CONNECTIONS", 5);

        let bind_addr: SocketAddr = get_env_default(
            "BIND_ADDR",
            SocketAddr::from((Ipv4Addr::LOCALHOST, 3001)),
        );
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .map_err(|_| InfraError::ConfigInvalid { var: "CORS_ORIGIN" })?;

        let bootstrap_admin = match (
            optional("BOOTSTRAP_ADMIN_EMAIL"),
            optional("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAdmin {
                email,
                password: SecretString::new(password.into()),
            }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(InfraError::ConfigMissing {
                    var: "BOOTSTRAP_ADMIN_PASSWORD",
                });
            }
            (None, Some(_)) => {
                return Err(InfraError::ConfigMissing {
                    var: "BOOTSTRAP_ADMIN_EMAIL",
                });
            }
        };

        Ok(Self {
            session_secret,
            session_ttl: Duration::days(session_ttl_days),
            cookie_secure,
            database_url,
            database_max_connections,
            bind_addr,
            cors_origin,
            bootstrap_admin,
        })
    }
}
