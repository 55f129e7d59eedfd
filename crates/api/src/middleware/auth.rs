//! The [`AuthUser`] extractor: a verified access token, or a 401.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use campus_core::department::ensure_can_manage;
use campus_core::error::CoreError;
use campus_core::roles::ROLE_SUPER_ADMIN;
use campus_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The signed-in admin, taken from the access token claims. Nothing is
/// read from the database per request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub username: String,
    pub role: String,
    /// Bound department for department admins.
    pub department: Option<String>,
}

impl AuthUser {
    pub fn is_super_admin(&self) -> bool {
        self.role == ROLE_SUPER_ADMIN
    }

    /// Reject with 403 unless this user may manage `department`.
    pub fn ensure_can_manage(&self, department: &str) -> Result<(), CoreError> {
        ensure_can_manage(&self.role, self.department.as_deref(), department)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| CoreError::Unauthorized("Invalid or expired token".into()))?;

        Ok(AuthUser {
            user_id: claims.sub,
            username: claims.username,
            role: claims.role,
            department: claims.department,
        })
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, CoreError> {
    let value = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| CoreError::Unauthorized("Sign in required".into()))?
        .to_str()
        .map_err(|_| CoreError::Unauthorized("Malformed Authorization header".into()))?;

    value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| CoreError::Unauthorized("Expected 'Authorization: Bearer <token>'".into()))
}
