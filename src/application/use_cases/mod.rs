pub mod analytics;
pub mod auth;
pub mod profile;
pub mod rating;
pub mod store;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::{identity::IdentityClaim, role::Role},
};

/// Fails closed unless the caller holds `role`.
pub fn require_role(claim: &IdentityClaim, role: Role) -> AppResult<()> {
    if claim.has_role(role) {
        Ok(())
    } else {
        tracing::warn!(subject = claim.id, role = %claim.role, required = %role, "role check failed");
        Err(AppError::Unauthorized)
    }
}

/// Fails closed unless the caller owns the object.
pub fn require_owner(claim: &IdentityClaim, owner_id: i64) -> AppResult<()> {
    if claim.id == owner_id {
        Ok(())
    } else {
        tracing::warn!(subject = claim.id, owner_id, "ownership check failed");
        Err(AppError::Unauthorized)
    }
}
