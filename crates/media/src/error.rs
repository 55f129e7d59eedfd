use std::fmt;

/// Errors raised by media store backends.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Invalid media handle '{0}'")]
    InvalidHandle(String),

    #[error("Media storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Media backend request failed: {0}")]
    Backend(String),

    #[error("Media store misconfigured: {0}")]
    Config(String),
}

impl MediaError {
    pub(crate) fn backend(context: &str, err: impl fmt::Display) -> Self {
        MediaError::Backend(format!("{context}: {err}"))
    }
}
