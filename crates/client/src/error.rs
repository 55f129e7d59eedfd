//! Errors surfaced by the client SDK.

use campus_core::error::{CoreError, ErrorBody};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{}", .body.error)]
    Server { status: u16, body: ErrorBody },

    /// Another submission from the same panel is still running.
    #[error("A request is already in progress")]
    Busy,

    /// A mutating call was made without a signed-in session.
    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Session store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session store decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status of a server-reported error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Machine-readable code of a server-reported error (`NOT_FOUND`, ...).
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Server { body, .. } => body.code.as_deref(),
            _ => None,
        }
    }
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => ClientError::Validation(msg),
            other => ClientError::Validation(other.to_string()),
        }
    }
}

/// Decode an error response body.
///
/// The API always answers with an [`ErrorBody`]; anything else (a proxy
/// page, an empty body) is kept as raw text.
pub fn parse_error_body(status: u16, text: &str) -> ErrorBody {
    if let Ok(body) = serde_json::from_str::<ErrorBody>(text) {
        return body;
    }
    let trimmed = text.trim();
    ErrorBody {
        error: if trimmed.is_empty() {
            format!("Request failed with status {status}")
        } else {
            trimmed.to_string()
        },
        code: None,
        details: None,
    }
}
