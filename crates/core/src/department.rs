//! Department (tenant) rules.
//!
//! The department name is the only multi-tenancy boundary: every content
//! record, overview and department-admin account carries one, and every
//! mutating request is checked against it here.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::ROLE_SUPER_ADMIN;
use crate::types::{DbId, Timestamp};

/// Maximum length of a department name.
pub const MAX_DEPARTMENT_NAME_LEN: usize = 100;

/// Validate a department name (non-empty after trimming, bounded length,
/// no control characters).
pub fn validate_department_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Department is required".into()));
    }
    if trimmed.len() != name.len() {
        return Err(CoreError::Validation(
            "Department must not have leading or trailing whitespace".into(),
        ));
    }
    if name.len() > MAX_DEPARTMENT_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Department must be at most {MAX_DEPARTMENT_NAME_LEN} characters"
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(CoreError::Validation(
            "Department must not contain control characters".into(),
        ));
    }
    Ok(())
}

/// Check that an account may manage content of `target`.
///
/// Super admins manage every department. Department admins manage only the
/// department they are bound to.
pub fn ensure_can_manage(
    role: &str,
    own_department: Option<&str>,
    target: &str,
) -> Result<(), CoreError> {
    if role == ROLE_SUPER_ADMIN {
        return Ok(());
    }
    match own_department {
        Some(own) if own == target => Ok(()),
        _ => Err(CoreError::Forbidden(format!(
            "Not allowed to manage content of department '{target}'"
        ))),
    }
}

/// A department as listed by `GET /api/departments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}
