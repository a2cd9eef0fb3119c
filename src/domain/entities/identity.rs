use serde::{Deserialize, Serialize};

use super::role::Role;

/// Identity facts carried inside a session token.
///
/// Derived once at the request boundary and handed explicitly to whatever
/// needs to know who is asking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl IdentityClaim {
    /// All four fields present: a positive subject id and non-blank email and name.
    pub fn is_complete(&self) -> bool {
        self.id > 0 && !self.email.trim().is_empty() && !self.name.trim().is_empty()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}
