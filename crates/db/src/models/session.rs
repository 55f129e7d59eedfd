//! Refresh-token sessions.

use campus_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row of `sessions`. Only the SHA-256 of the refresh token is stored.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
}

/// A session about to be issued.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
