//! Gallery photo rows. Albums themselves are `content_items` rows.

use campus_core::content::Photo;
use campus_core::error::CoreError;
use campus_core::media::FileRef;
use campus_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `album_photos` table.
#[derive(Debug, Clone, FromRow)]
pub struct PhotoRow {
    pub id: DbId,
    pub album_id: DbId,
    pub caption: Option<String>,
    pub media_url: String,
    pub media_deletion_handle: String,
    pub media_kind: String,
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<PhotoRow> for Photo {
    type Error = CoreError;

    fn try_from(row: PhotoRow) -> Result<Self, Self::Error> {
        Ok(Photo {
            id: row.id,
            album_id: row.album_id,
            caption: row.caption,
            file: FileRef {
                url: row.media_url,
                deletion_handle: row.media_deletion_handle,
                resource_kind: row.media_kind.parse()?,
            },
            display_order: row.display_order,
            created_at: row.created_at,
        })
    }
}

/// Insert payload for a photo.
#[derive(Debug, Clone)]
pub struct CreatePhoto {
    pub album_id: DbId,
    pub caption: Option<String>,
    pub file: FileRef,
    pub display_order: i32,
}
