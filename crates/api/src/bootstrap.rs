//! First-run provisioning of a super admin account.

use campus_core::error::CoreError;
use campus_core::roles::ROLE_SUPER_ADMIN;
use campus_db::models::user::CreateUser;
use campus_db::repositories::UserRepo;
use sqlx::PgPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the configured super admin if no active super admin exists.
///
/// Returns `true` when an account was created. An existing account with
/// the same username is left untouched.
pub async fn ensure_super_admin(pool: &PgPool, admin: &BootstrapAdmin) -> AppResult<bool> {
    if UserRepo::count_active_by_role(pool, ROLE_SUPER_ADMIN).await? > 0 {
        return Ok(false);
    }
    if UserRepo::find_by_username(pool, &admin.username).await?.is_some() {
        tracing::warn!(
            username = %admin.username,
            "No active super admin, but the bootstrap username is taken; skipping",
        );
        return Ok(false);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: admin.username.clone(),
            password_hash,
            role: ROLE_SUPER_ADMIN.to_string(),
            department: None,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Bootstrap super admin created");
    Ok(true)
}
