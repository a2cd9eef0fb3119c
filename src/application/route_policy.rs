//! Static path-to-role table consulted by the request gate.

use time::OffsetDateTime;

use crate::{
    application::token::TokenCodec,
    domain::entities::{identity::IdentityClaim, role::Role},
};

pub const LOGIN_PATH: &str = "/login";
pub const NEUTRAL_PATH: &str = "/";

/// What a path requires of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Role(Role),
}

/// Where a caller with the wrong role is sent instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Path(&'static str),
    /// The landing path of the caller's own role.
    RoleLanding,
}

#[derive(Debug, Clone)]
struct AreaRule {
    prefix: &'static str,
    role: Role,
    fallback: Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Forward to the handler, with the verified claim unless the path is public.
    Proceed(Option<IdentityClaim>),
    /// Send to the login page; `clear_session` when the presented token was bad.
    Login { clear_session: bool },
    /// Authenticated but not allowed here.
    Redirect(&'static str),
}

#[derive(Debug, Clone)]
pub struct RoutePolicy {
    public: Vec<&'static str>,
    areas: Vec<AreaRule>,
}

impl RoutePolicy {
    pub fn new() -> Self {
        Self {
            public: Vec::new(),
            areas: Vec::new(),
        }
    }

    /// The site's policy: home, login and registration are public; `/admin`
    /// and `/dashboard` need an administrator; `/store-owner` needs a store
    /// owner; every other path needs any valid session.
    pub fn standard() -> Self {
        Self::new()
            .public(NEUTRAL_PATH)
            .public(LOGIN_PATH)
            .public("/register")
            .area("/admin", Role::Administrator, Fallback::Path(NEUTRAL_PATH))
            .area("/dashboard", Role::Administrator, Fallback::Path(NEUTRAL_PATH))
            .area("/store-owner", Role::StoreOwner, Fallback::RoleLanding)
    }

    /// Exact-match public path.
    pub fn public(mut self, path: &'static str) -> Self {
        self.public.push(path);
        self
    }

    /// Every path at or below `prefix` requires `role`.
    pub fn area(mut self, prefix: &'static str, role: Role, fallback: Fallback) -> Self {
        self.areas.push(AreaRule {
            prefix: prefix.trim_end_matches('/'),
            role,
            fallback,
        });
        self
    }

    pub fn access_for(&self, path: &str) -> Access {
        if self.is_public(path) {
            return Access::Public;
        }
        match self.matching_area(path) {
            Some(rule) => Access::Role(rule.role),
            None => Access::Authenticated,
        }
    }

    pub fn decide(&self, path: &str, token: Option<&str>, codec: &TokenCodec) -> GateDecision {
        self.decide_at(path, token, codec, OffsetDateTime::now_utc())
    }

    pub fn decide_at(
        &self,
        path: &str,
        token: Option<&str>,
        codec: &TokenCodec,
        now: OffsetDateTime,
    ) -> GateDecision {
        if self.is_public(path) {
            return GateDecision::Proceed(None);
        }

        let Some(token) = token else {
            return GateDecision::Login {
                clear_session: false,
            };
        };

        let claim = match codec.verify_at(token, now) {
            Ok(claim) => claim,
            Err(reason) => {
                tracing::debug!(path, %reason, "session token rejected");
                return GateDecision::Login {
                    clear_session: true,
                };
            }
        };

        if let Some(rule) = self.matching_area(path)
            && claim.role != rule.role
        {
            let to = match rule.fallback {
                Fallback::Path(to) => to,
                Fallback::RoleLanding => claim.role.landing_path(),
            };
            tracing::debug!(path, role = %claim.role, required = %rule.role, to, "role not allowed in area");
            return GateDecision::Redirect(to);
        }

        GateDecision::Proceed(Some(claim))
    }

    fn is_public(&self, path: &str) -> bool {
        self.public.iter().any(|public| *public == path)
    }

    // Most specific prefix wins when areas overlap.
    fn matching_area(&self, path: &str) -> Option<&AreaRule> {
        self.areas
            .iter()
            .filter(|rule| is_within(path, rule.prefix))
            .max_by_key(|rule| rule.prefix.len())
    }
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// `/admin` covers `/admin` and `/admin/users` but not `/administrators`.
fn is_within(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
