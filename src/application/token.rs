//! Session token codec.
//!
//! Wire format: `base64(payload_json) "." base64(secret || base64(payload_json))`.
//! The payload carries the identity claim plus `iat`/`exp` in unix seconds.
//!
//! The integrity tag is the secret and the encoded payload concatenated and
//! base64-encoded. It is neither a hash nor an HMAC: anyone holding a token
//! can read the secret back out of the tag. Do not use it as a production
//! trust boundary.

use base64::{Engine, engine::general_purpose::STANDARD};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::{identity::IdentityClaim, role::Role},
};

pub const DEFAULT_SESSION_TTL: Duration = Duration::days(7);

/// Why a token was rejected. Only ever logged; callers see `AppError::InvalidToken`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is empty")]
    Empty,
    #[error("token does not have exactly two segments")]
    Malformed,
    #[error("integrity tag does not match payload")]
    TagMismatch,
    #[error("payload is not a session record")]
    Payload,
    #[error("payload is missing required claim fields")]
    MissingField,
    #[error("token has expired")]
    Expired,
}

impl From<TokenError> for AppError {
    fn from(_: TokenError) -> Self {
        AppError::InvalidToken
    }
}

#[derive(Serialize)]
struct SessionPayload<'a> {
    id: i64,
    email: &'a str,
    name: &'a str,
    role: Role,
    iat: i64,
    exp: i64,
}

// Decoding side is lenient about presence so a missing field can be told
// apart from a payload that is not JSON at all.
#[derive(Deserialize)]
struct RawPayload {
    id: Option<i64>,
    email: Option<String>,
    name: Option<String>,
    role: Option<Role>,
    exp: Option<i64>,
}

pub struct TokenCodec {
    secret: SecretString,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: SecretString, ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, claim: &IdentityClaim) -> AppResult<String> {
        self.issue_at(claim, OffsetDateTime::now_utc())
    }

    pub fn issue_at(&self, claim: &IdentityClaim, issued_at: OffsetDateTime) -> AppResult<String> {
        if !claim.is_complete() {
            return Err(AppError::InvalidClaim(
                "id, email, name and role are required".into(),
            ));
        }

        let iat = issued_at.unix_timestamp();
        let payload = SessionPayload {
            id: claim.id,
            email: &claim.email,
            name: &claim.name,
            role: claim.role,
            iat,
            exp: iat + self.ttl.whole_seconds(),
        };
        let json = serde_json::to_vec(&payload).map_err(|e| AppError::Internal(e.to_string()))?;
        let encoded = STANDARD.encode(json);
        let tag = self.tag(&encoded);

        Ok(format!("{encoded}.{tag}"))
    }

    pub fn verify(&self, token: &str) -> Result<IdentityClaim, TokenError> {
        self.verify_at(token, OffsetDateTime::now_utc())
    }

    pub fn verify_at(&self, token: &str, now: OffsetDateTime) -> Result<IdentityClaim, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Empty);
        }

        let mut segments = token.split('.');
        let (Some(encoded), Some(tag), None) = (segments.next(), segments.next(), segments.next())
        else {
            return Err(TokenError::Malformed);
        };
        if encoded.is_empty() || tag.is_empty() {
            return Err(TokenError::Malformed);
        }

        if self.tag(encoded) != tag {
            return Err(TokenError::TagMismatch);
        }

        let json = STANDARD.decode(encoded).map_err(|_| TokenError::Payload)?;
        let raw: RawPayload = serde_json::from_slice(&json).map_err(|_| TokenError::Payload)?;

        let (Some(id), Some(email), Some(name), Some(role), Some(exp)) =
            (raw.id, raw.email, raw.name, raw.role, raw.exp)
        else {
            return Err(TokenError::MissingField);
        };

        let claim = IdentityClaim {
            id,
            email,
            name,
            role,
        };
        if !claim.is_complete() {
            return Err(TokenError::MissingField);
        }

        if exp <= now.unix_timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claim)
    }

    fn tag(&self, encoded_payload: &str) -> String {
        STANDARD.encode(format!("{}{encoded_payload}", self.secret.expose_secret()))
    }
}
