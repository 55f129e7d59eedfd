//! Role-based access control extractors.
//!
//! Department scoping is checked per record with
//! [`AuthUser::ensure_can_manage`]; the extractors here gate whole routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use campus_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `super_admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireSuperAdmin(user): RequireSuperAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireSuperAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_super_admin() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Super admin role required".into(),
            )));
        }
        Ok(RequireSuperAdmin(user))
    }
}
