use chrono::NaiveDateTime;
use serde::Serialize;

use super::{identity::IdentityClaim, role::Role};

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: NaiveDateTime,
}

impl User {
    pub fn claim(&self) -> IdentityClaim {
        IdentityClaim {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: NaiveDateTime,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// A user as listed to administrators.
#[derive(Debug, Clone, Serialize)]
pub struct UserActivity {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub store_count: i64,
    pub rating_count: i64,
}
