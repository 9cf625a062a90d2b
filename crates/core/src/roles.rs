//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role`.

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_USER];

/// Validate that `role` is one of the known role names.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::invalid(
            "role",
            format!("Invalid role '{role}'. Must be one of: {VALID_ROLES:?}"),
        ))
    }
}
