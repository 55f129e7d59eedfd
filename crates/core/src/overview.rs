//! Department overview: one free-text description per department.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

pub const MAX_DESCRIPTION_LEN: usize = 20_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentOverview {
    pub department: String,
    pub description: String,
    pub updated_at: Timestamp,
}

/// Body of `POST /api/department-overview`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertOverview {
    pub department_name: String,
    pub description: String,
}

pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation("Description is required".into()));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}
