//! Content item rows and DTOs (all categories share the `content_items` table).

use campus_core::category::ContentCategory;
use campus_core::content::ContentItem;
use campus_core::error::CoreError;
use campus_core::media::FileRef;
use campus_core::types::{DbId, Timestamp};
use serde_json::{Map, Value};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity struct (database row)
// ---------------------------------------------------------------------------

/// A row from the `content_items` table.
#[derive(Debug, Clone, FromRow)]
pub struct ContentItemRow {
    pub id: DbId,
    pub category: String,
    pub department: String,
    pub title: String,
    pub fields: Value,
    pub link_url: Option<String>,
    pub media_url: Option<String>,
    pub media_deletion_handle: Option<String>,
    pub media_kind: Option<String>,
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<ContentItemRow> for ContentItem {
    type Error = CoreError;

    fn try_from(row: ContentItemRow) -> Result<Self, Self::Error> {
        let file = FileRef::from_columns(
            row.media_url,
            row.media_deletion_handle,
            row.media_kind.as_deref(),
        )?;
        let fields = match row.fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Ok(ContentItem {
            id: row.id,
            category: row.category.parse()?,
            department: row.department,
            title: row.title,
            fields,
            link: row.link_url,
            file,
            display_order: row.display_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Insert payload. Validation happens before this is built.
#[derive(Debug, Clone)]
pub struct CreateContentItem {
    pub category: ContentCategory,
    pub department: String,
    pub title: String,
    pub fields: Map<String, Value>,
    pub link: Option<String>,
    pub file: Option<FileRef>,
    pub display_order: i32,
}

/// What happens to the attachment of a record on update.
#[derive(Debug, Clone, PartialEq)]
pub enum AttachmentUpdate {
    /// Keep whatever the record holds.
    Keep,
    /// Replace with an uploaded file; any link is cleared.
    File(FileRef),
    /// Replace with an external link; any file reference is cleared.
    Link(String),
}

/// Partial update. `None` leaves the column untouched.
#[derive(Debug, Clone)]
pub struct UpdateContentItem {
    pub title: Option<String>,
    pub fields: Option<Map<String, Value>>,
    pub display_order: Option<i32>,
    pub attachment: AttachmentUpdate,
}
