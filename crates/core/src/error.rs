use std::fmt::Display;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`] keyed by an id or a name.
    pub fn not_found(entity: &'static str, key: impl Display) -> Self {
        CoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

/// JSON body returned by the API on every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    /// Human-readable message, shown verbatim to editors.
    pub error: String,
    /// Machine-readable code (`VALIDATION_ERROR`, `NOT_FOUND`, ...).
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}
