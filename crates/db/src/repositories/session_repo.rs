//! Repository for `sessions`.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{NewSession, Session};

const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, is_revoked, created_at";

pub struct SessionRepo;

impl SessionRepo {
    pub async fn create(pool: &PgPool, input: &NewSession) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (user_id, refresh_token_hash, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// The unrevoked, unexpired session holding this refresh token hash.
    pub async fn find_active(pool: &PgPool, hash: &str) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions \
             WHERE refresh_token_hash = $1 AND NOT is_revoked AND expires_at > NOW()"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke session `old_id` and issue `next` in one transaction.
    ///
    /// Returns `None` when `old_id` was already revoked, so a refresh token
    /// replayed concurrently yields at most one new session.
    pub async fn rotate(
        pool: &PgPool,
        old_id: DbId,
        next: &NewSession,
    ) -> Result<Option<Session>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let revoked = sqlx::query("UPDATE sessions SET is_revoked = true WHERE id = $1 AND NOT is_revoked")
            .bind(old_id)
            .execute(&mut *tx)
            .await?;
        if revoked.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO sessions (user_id, refresh_token_hash, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let session = sqlx::query_as::<_, Session>(&query)
            .bind(next.user_id)
            .bind(&next.refresh_token_hash)
            .bind(next.expires_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(session))
    }

    /// Revoke every live session of a user. Returns how many were revoked.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE sessions SET is_revoked = true WHERE user_id = $1 AND NOT is_revoked")
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }

    /// Delete expired and revoked sessions.
    pub async fn purge_stale(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE is_revoked OR expires_at <= NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
