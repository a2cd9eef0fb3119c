use serde::{Deserialize, Serialize};

/// Account role. Decides which route areas a session may enter.
///
/// The serialized names are shared by session tokens, JSON bodies and the
/// `user_role` column, so they must not change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role")]
pub enum Role {
    #[serde(rename = "system_admin")]
    #[sqlx(rename = "system_admin")]
    Administrator,
    #[serde(rename = "store_owner")]
    #[sqlx(rename = "store_owner")]
    StoreOwner,
    #[default]
    #[serde(rename = "normal_user")]
    #[sqlx(rename = "normal_user")]
    Customer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Administrator, Role::StoreOwner, Role::Customer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "system_admin",
            Role::StoreOwner => "store_owner",
            Role::Customer => "normal_user",
        }
    }

    /// Where a session with this role lands after login, or after being
    /// turned away from an area it may not enter.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Administrator => "/admin",
            Role::StoreOwner => "/store-owner/stores",
            Role::Customer => "/stores",
        }
    }

    /// Roles a visitor may pick for themselves at registration.
    pub fn is_self_assignable(&self) -> bool {
        match self {
            Role::Administrator => false,
            Role::StoreOwner | Role::Customer => true,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid role: {}. Must be 'system_admin', 'store_owner' or 'normal_user'",
                    s
                )
            })
    }
}
