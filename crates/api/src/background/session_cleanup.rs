//! Hourly purge of expired and revoked sessions.

use std::time::Duration;

use campus_db::repositories::SessionRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// How often the cleanup job runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

/// Run the session cleanup loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        "Session cleanup job started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session cleanup job stopping");
                break;
            }
            _ = interval.tick() => {
                match SessionRepo::purge_stale(&pool).await {
                    Ok(0) => tracing::debug!("Session cleanup: nothing to purge"),
                    Ok(deleted) => tracing::info!(deleted, "Session cleanup: purged sessions"),
                    Err(e) => tracing::error!(error = %e, "Session cleanup failed"),
                }
            }
        }
    }
}
