use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use campus_core::error::{CoreError, ErrorBody};
use campus_media::MediaError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Every variant renders as `{ "error", "code", "details" }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The media store refused or failed a request.
    #[error("Media store error: {0}")]
    Media(#[from] MediaError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Extractor rejections keep axum's message but use the JSON error body.
macro_rules! bad_request_from_rejection {
    ($($rejection:ty),+ $(,)?) => {
        $(impl From<$rejection> for AppError {
            fn from(rejection: $rejection) -> Self {
                AppError::BadRequest(rejection.body_text())
            }
        })+
    };
}

bad_request_from_rejection!(JsonRejection, PathRejection, QueryRejection, MultipartRejection);

/// Router fallback: unknown routes answer with a JSON 404.
pub async fn route_not_found(uri: Uri) -> AppError {
    CoreError::not_found("Route", uri.path()).into()
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

type Classified = (StatusCode, &'static str, String, Option<String>);

fn internal() -> Classified {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
        None,
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, key } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} '{key}' not found"),
                    None,
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone(), None),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
                }
                CoreError::Forbidden(msg) => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone(), None)
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::Media(err) => classify_media_error(err),

            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = ErrorBody {
            error: message,
            code: Some(code.to_string()),
            details,
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations on `uq_*` constraints map to 409.
/// - Foreign-key violations map to 409 (the row is still referenced, or
///   references something that is gone).
/// - Check violations on `ck_*` constraints map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> Classified {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
            None,
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some("23505") if constraint.starts_with("uq_") => {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                        None,
                    );
                }
                Some("23503") => {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        "The record is referenced by, or references, other data".to_string(),
                        Some(constraint.to_string()),
                    );
                }
                Some("23514") if constraint.starts_with("ck_") => {
                    return (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        format!("Value violates check constraint: {constraint}"),
                        None,
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

fn classify_media_error(err: &MediaError) -> Classified {
    tracing::error!(error = %err, "Media store error");
    match err {
        MediaError::Config(_) => internal(),
        other => (
            StatusCode::BAD_GATEWAY,
            "MEDIA_STORE_ERROR",
            "The media store could not complete the request".to_string(),
            Some(other.to_string()),
        ),
    }
}
