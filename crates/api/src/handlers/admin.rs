//! Handlers for the `/admin` resource (admin account management).
//!
//! All handlers require the `super_admin` role via [`RequireSuperAdmin`].

use axum::extract::State;
use axum::http::StatusCode;
use campus_core::error::CoreError;
use campus_core::roles::validate_role_binding;
use campus_core::types::DbId;
use campus_db::models::user::{CreateUser, UserResponse};
use campus_db::repositories::{DepartmentRepo, SessionRepo, UserRepo};
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path};
use crate::middleware::rbac::RequireSuperAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: String,
    #[serde(default)]
    pub department: Option<String>,
}

/// Request body for `PUT /admin/users/{id}/password`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPasswordRequest {
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/admin/users
///
/// Create an admin account. A department admin must be bound to an
/// existing department.
pub async fn create_user(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let username = input.username.trim().to_string();
    if username.is_empty() {
        return Err(CoreError::Validation("Username is required".into()).into());
    }

    let department = input.department.filter(|d| !d.trim().is_empty());
    validate_role_binding(&input.role, department.as_deref())?;
    if let Some(department) = &department {
        if !DepartmentRepo::exists(&state.pool, department).await? {
            return Err(
                CoreError::Validation(format!("Unknown department '{department}'")).into(),
            );
        }
    }

    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create_dto = CreateUser {
        username,
        password_hash: hashed,
        role: input.role,
        department,
    };
    let user = UserRepo::create(&state.pool, &create_dto).await?;

    tracing::info!(
        user_id = user.id,
        role = %user.role,
        created_by = admin.user_id,
        "Admin account created",
    );

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PUT /api/admin/users/{id}/password
///
/// Set a new password, clear any lockout and revoke existing sessions.
pub async fn set_password(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<SetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    if !UserRepo::update_password(&state.pool, id, &hashed).await? {
        return Err(CoreError::not_found("User", id).into());
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(user_id = id, changed_by = admin.user_id, "Password reset");

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/admin/users/{id}
///
/// Soft-deactivate an account and revoke its sessions. Returns 204.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(CoreError::Validation("You cannot deactivate your own account".into()).into());
    }

    if !UserRepo::deactivate(&state.pool, id).await? {
        return Err(CoreError::not_found("User", id).into());
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(user_id = id, deactivated_by = admin.user_id, "Admin account deactivated");

    Ok(StatusCode::NO_CONTENT)
}
