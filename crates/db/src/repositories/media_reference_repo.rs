//! Read-only view over every media deletion handle the database still
//! references. Used by the media reconciliation sweep.

use std::collections::HashSet;

use sqlx::PgPool;

pub struct MediaReferenceRepo;

impl MediaReferenceRepo {
    /// Every deletion handle held by a content item or an album photo.
    pub async fn referenced_handles(pool: &PgPool) -> Result<HashSet<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT media_deletion_handle FROM content_items \
             WHERE media_deletion_handle IS NOT NULL \
             UNION \
             SELECT media_deletion_handle FROM album_photos",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(h,)| h).collect())
    }

    /// Count the rows (items and photos) that reference `handle`.
    pub async fn count_references(pool: &PgPool, handle: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT \
                 (SELECT COUNT(*) FROM content_items WHERE media_deletion_handle = $1) \
               + (SELECT COUNT(*) FROM album_photos WHERE media_deletion_handle = $1)",
        )
        .bind(handle)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
