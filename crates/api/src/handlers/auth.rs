//! Handlers for the `/auth` resource (login, refresh, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_db::models::session::NewSession;
use campus_db::models::user::User;
use campus_db::repositories::{SessionRepo, UserRepo};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, hash_refresh_token, TokenSubject,
};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Maximum consecutive failed login attempts before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i64 = 15;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`] and returned by `/auth/me`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub role: String,
    pub department: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Verify a username and password and open a session. Unknown users and
/// wrong passwords get the same 401.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let rejected = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        ))
    };

    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(rejected)?;
    ensure_can_sign_in(&user)?;

    let password_ok = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_ok {
        record_failed_login(&state, &user).await?;
        return Err(rejected());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;
    let (response, session) = issue_tokens(&state, &user)?;
    SessionRepo::create(&state.pool, &session).await?;

    tracing::info!(
        user_id = user.id,
        role = %user.role,
        department = user.department.as_deref().unwrap_or("-"),
        "User logged in",
    );

    Ok(Json(response))
}

/// POST /api/auth/refresh
///
/// Trade a refresh token for a new token pair. The presented token is
/// revoked; presenting it again fails.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid or expired refresh token".into()));

    let session = SessionRepo::find_active(&state.pool, &hash_refresh_token(&input.refresh_token))
        .await?
        .ok_or_else(invalid)?;

    // Reload the account so role and department changes reach the new token.
    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(invalid)?;
    ensure_can_sign_in(&user)?;

    let (response, next) = issue_tokens(&state, &user)?;
    SessionRepo::rotate(&state.pool, session.id, &next)
        .await?
        .ok_or_else(invalid)?;

    tracing::debug!(user_id = user.id, "Refresh token rotated");

    Ok(Json(response))
}

/// POST /api/auth/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    tracing::info!(user_id = auth_user.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/me
///
/// The caller as seen in its access token.
pub async fn me(auth_user: AuthUser) -> Json<UserInfo> {
    Json(UserInfo {
        id: auth_user.user_id,
        username: auth_user.username,
        role: auth_user.role,
        department: auth_user.department,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Deactivated accounts and accounts inside a lockout window get a 403.
fn ensure_can_sign_in(user: &User) -> AppResult<()> {
    if !user.is_active {
        return Err(CoreError::Forbidden("Account is deactivated".into()).into());
    }
    if user.locked_until.is_some_and(|until| until > Utc::now()) {
        return Err(CoreError::Forbidden(
            "Account is temporarily locked. Try again later.".into(),
        )
        .into());
    }
    Ok(())
}

/// Count a wrong password; the fifth in a row locks the account.
async fn record_failed_login(state: &AppState, user: &User) -> AppResult<()> {
    UserRepo::increment_failed_login(&state.pool, user.id).await?;

    if user.failed_login_count + 1 >= MAX_FAILED_ATTEMPTS {
        let until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
        UserRepo::lock_account(&state.pool, user.id, until).await?;
        tracing::warn!(user_id = user.id, %until, "Account locked after repeated failed logins");
    }
    Ok(())
}

/// Mint an access token and a refresh token for `user`.
///
/// Returns the response body and the session row to persist for the
/// refresh token; the caller decides whether that is a fresh session or a
/// rotation.
fn issue_tokens(state: &AppState, user: &User) -> AppResult<(AuthResponse, NewSession)> {
    let jwt = &state.config.jwt;
    let subject = TokenSubject {
        user_id: user.id,
        username: &user.username,
        role: &user.role,
        department: user.department.as_deref(),
    };
    let access_token = generate_access_token(subject, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let (refresh_token, refresh_token_hash) = generate_refresh_token();

    let session = NewSession {
        user_id: user.id,
        refresh_token_hash,
        expires_at: Utc::now() + chrono::Duration::days(jwt.refresh_token_expiry_days),
    };
    let response = AuthResponse {
        access_token,
        refresh_token,
        expires_in: jwt.access_token_expiry_mins * 60,
        user: UserInfo {
            id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
            department: user.department.clone(),
        },
    };
    Ok((response, session))
}
