//! Periodic media reconciliation sweep.
//!
//! Deletes stored objects that no content item or album photo references
//! and that are older than the configured grace period. These are left
//! behind when a metadata write fails after its upload, or when releasing a
//! replaced file fails.

use std::sync::Arc;
use std::time::Duration;

use campus_db::repositories::MediaReferenceRepo;
use campus_media::{find_orphans, MediaError, MediaStore};
use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::config::ReconcileConfig;

#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("Media store error: {0}")]
    Media(#[from] MediaError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Outcome of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Objects the store reported.
    pub scanned: usize,
    /// Orphans that were deleted.
    pub deleted: Vec<String>,
    /// Orphans whose delete failed; retried on the next sweep.
    pub failed: usize,
}

/// Run a single sweep.
///
/// Every candidate is re-checked against the database right before its
/// delete, so a record written after the reference snapshot keeps its file.
pub async fn sweep_once(
    pool: &PgPool,
    store: &dyn MediaStore,
    grace: chrono::Duration,
) -> Result<SweepReport, SweepError> {
    let objects = store.list().await?;
    let scanned = objects.len();
    let referenced = MediaReferenceRepo::referenced_handles(pool).await?;
    let cutoff = Utc::now() - grace;

    let mut report = SweepReport {
        scanned,
        ..SweepReport::default()
    };

    for orphan in find_orphans(objects, &referenced, cutoff) {
        if MediaReferenceRepo::count_references(pool, &orphan.handle).await? > 0 {
            continue;
        }
        match store.delete(&orphan.handle).await {
            Ok(()) => report.deleted.push(orphan.handle),
            Err(e) => {
                tracing::warn!(handle = %orphan.handle, error = %e, "Reconciliation: delete failed");
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

/// Run the reconciliation loop until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    store: Arc<dyn MediaStore>,
    config: ReconcileConfig,
    cancel: CancellationToken,
) {
    let grace = chrono::Duration::hours(config.grace_hours);

    tracing::info!(
        backend = store.backend_tag(),
        grace_hours = config.grace_hours,
        interval_secs = config.interval_secs,
        "Media reconciliation job started"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(config.interval_secs.max(1)));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Media reconciliation job stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep_once(&pool, store.as_ref(), grace).await {
                    Ok(report) if report.deleted.is_empty() && report.failed == 0 => {
                        tracing::debug!(scanned = report.scanned, "Media reconciliation: nothing to collect");
                    }
                    Ok(report) => {
                        tracing::info!(
                            scanned = report.scanned,
                            deleted = report.deleted.len(),
                            failed = report.failed,
                            "Media reconciliation: collected orphaned files"
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Media reconciliation: sweep failed");
                    }
                }
            }
        }
    }
}
