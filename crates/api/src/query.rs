//! Shared query parameter types for API handlers.

use campus_core::department::validate_department_name;
use campus_core::error::CoreError;
use serde::Deserialize;

/// `?department=<name>`, required on every public listing.
///
/// Kept optional at the serde level so a missing parameter becomes a
/// validation error with a readable message instead of a bare rejection.
#[derive(Debug, Deserialize)]
pub struct DepartmentParams {
    pub department: Option<String>,
}

impl DepartmentParams {
    /// The department to scope to, or a validation error.
    ///
    /// There is no "all departments" listing.
    pub fn require(self) -> Result<String, CoreError> {
        let department = self
            .department
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| {
                CoreError::Validation("Query parameter 'department' is required".into())
            })?;
        validate_department_name(&department)?;
        Ok(department)
    }
}
