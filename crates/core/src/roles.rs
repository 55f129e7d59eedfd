//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `users.role` in
//! `20260301000002_create_users_and_sessions.sql`.

use crate::error::CoreError;

/// Manages every department, department accounts and the department list.
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

/// Manages content of exactly one department.
pub const ROLE_DEPARTMENT_ADMIN: &str = "department_admin";

pub const VALID_ROLES: &[&str] = &[ROLE_SUPER_ADMIN, ROLE_DEPARTMENT_ADMIN];

/// Validate a role name and its department binding.
///
/// A department admin must be bound to a department; a super admin must not.
pub fn validate_role_binding(role: &str, department: Option<&str>) -> Result<(), CoreError> {
    match (role, department) {
        (ROLE_SUPER_ADMIN, None) => Ok(()),
        (ROLE_SUPER_ADMIN, Some(_)) => Err(CoreError::Validation(
            "A super admin is not bound to a department".into(),
        )),
        (ROLE_DEPARTMENT_ADMIN, Some(d)) if !d.trim().is_empty() => Ok(()),
        (ROLE_DEPARTMENT_ADMIN, _) => Err(CoreError::Validation(
            "A department admin must be bound to a department".into(),
        )),
        (other, _) => Err(CoreError::Validation(format!(
            "Invalid role '{other}'. Must be one of: {VALID_ROLES:?}"
        ))),
    }
}
