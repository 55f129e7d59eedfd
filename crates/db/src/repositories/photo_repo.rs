//! Repository for the `album_photos` table (gallery album contents).

use std::collections::HashMap;

use campus_core::content::{Album, ContentItem, Photo};
use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::album::{CreatePhoto, PhotoRow};
use crate::models::decode;

const COLUMNS: &str = "\
    id, album_id, caption, media_url, media_deletion_handle, media_kind, \
    display_order, created_at, updated_at";

/// Provides data access for photos nested under gallery albums.
pub struct PhotoRepo;

impl PhotoRepo {
    /// List an album's photos in display order.
    pub async fn list_by_album(pool: &PgPool, album_id: DbId) -> Result<Vec<Photo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM album_photos \
             WHERE album_id = $1 \
             ORDER BY display_order ASC, id ASC"
        );
        sqlx::query_as::<_, PhotoRow>(&query)
            .bind(album_id)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Load the photos of several albums in one query and pair them up.
    ///
    /// Album order is preserved; photos keep their display order.
    pub async fn attach_to_albums(
        pool: &PgPool,
        albums: Vec<ContentItem>,
    ) -> Result<Vec<Album>, sqlx::Error> {
        let ids: Vec<DbId> = albums.iter().map(|a| a.id).collect();
        let query = format!(
            "SELECT {COLUMNS} FROM album_photos \
             WHERE album_id = ANY($1) \
             ORDER BY album_id, display_order ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, PhotoRow>(&query)
            .bind(&ids[..])
            .fetch_all(pool)
            .await?;

        let mut by_album: HashMap<DbId, Vec<Photo>> = HashMap::new();
        for row in rows {
            let photo: Photo = decode(row)?;
            by_album.entry(photo.album_id).or_default().push(photo);
        }

        Ok(albums
            .into_iter()
            .map(|item| {
                let photos = by_album.remove(&item.id).unwrap_or_default();
                Album { item, photos }
            })
            .collect())
    }

    /// Find a photo, but only if it belongs to `album_id`.
    pub async fn find_in_album(
        pool: &PgPool,
        album_id: DbId,
        photo_id: DbId,
    ) -> Result<Option<Photo>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM album_photos WHERE id = $1 AND album_id = $2");
        sqlx::query_as::<_, PhotoRow>(&query)
            .bind(photo_id)
            .bind(album_id)
            .fetch_optional(pool)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn create(pool: &PgPool, input: &CreatePhoto) -> Result<Photo, sqlx::Error> {
        let query = format!(
            "INSERT INTO album_photos \
                 (album_id, caption, media_url, media_deletion_handle, media_kind, display_order) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PhotoRow>(&query)
            .bind(input.album_id)
            .bind(&input.caption)
            .bind(&input.file.url)
            .bind(&input.file.deletion_handle)
            .bind(input.file.resource_kind.as_str())
            .bind(input.display_order)
            .fetch_one(pool)
            .await?;
        decode(row)
    }

    /// Delete a photo by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, photo_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM album_photos WHERE id = $1")
            .bind(photo_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find any photo by ID regardless of album.
    pub async fn find_by_id(pool: &PgPool, photo_id: DbId) -> Result<Option<Photo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM album_photos WHERE id = $1");
        sqlx::query_as::<_, PhotoRow>(&query)
            .bind(photo_id)
            .fetch_optional(pool)
            .await?
            .map(decode)
            .transpose()
    }
}
