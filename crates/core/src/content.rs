//! Content records as they travel over the wire, plus the submission
//! payload accepted by create/update endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::category::ContentCategory;
use crate::error::CoreError;
use crate::media::FileRef;
use crate::types::{DbId, Timestamp};

/// Maximum length of a record title.
pub const MAX_TITLE_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One record of any content category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: DbId,
    pub category: ContentCategory,
    pub department: String,
    pub title: String,
    /// Category-specific values, keyed by descriptor field name.
    #[serde(default)]
    pub fields: Map<String, Value>,
    pub link: Option<String>,
    pub file: Option<FileRef>,
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ContentItem {
    pub fn has_attachment(&self) -> bool {
        self.file.is_some() || self.link.is_some()
    }
}

/// A photo inside a gallery album.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: DbId,
    pub album_id: DbId,
    pub caption: Option<String>,
    pub file: FileRef,
    pub display_order: i32,
    pub created_at: Timestamp,
}

/// A gallery album: the album record plus its ordered photos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(flatten)]
    pub item: ContentItem,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

// ---------------------------------------------------------------------------
// Submissions
// ---------------------------------------------------------------------------

/// Body of `POST /api/<category>` and `PUT /api/<category>/<id>`.
///
/// Create requires `department` and `title`; update treats every field as
/// optional and leaves absent ones untouched. Multipart submissions are
/// folded into the same shape by the API layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, alias = "name", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
}

impl ContentPayload {
    /// Treat empty strings as "not provided", which is what HTML-style forms
    /// send for untouched inputs.
    pub fn normalized(mut self) -> Self {
        fn blank_to_none(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }
        self.department = blank_to_none(self.department);
        self.link = blank_to_none(self.link).map(|l| l.trim().to_string());
        self
    }
}

/// Body of `POST /api/gallery/<albumId>/photos` (multipart text parts).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoPayload {
    pub caption: Option<String>,
    pub display_order: Option<i32>,
}

/// Validate a record title (non-empty, <= [`MAX_TITLE_LEN`] chars).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title is required".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn payload_accepts_name_as_title() {
        let payload: ContentPayload = serde_json::from_value(json!({
            "department": "Law",
            "name": "Dr. A. Rao",
            "fields": {"quote": "Inspiring"}
        }))
        .unwrap();
        assert_eq!(payload.title.as_deref(), Some("Dr. A. Rao"));
    }

    #[test]
    fn normalized_drops_blank_link_and_department() {
        let payload = ContentPayload {
            department: Some("".into()),
            link: Some("  ".into()),
            ..Default::default()
        }
        .normalized();
        assert!(payload.department.is_none());
        assert!(payload.link.is_none());
    }

    #[test]
    fn title_validation() {
        assert!(validate_title("B.Tech CSE Syllabus 2024").is_ok());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"t".repeat(MAX_TITLE_LEN + 1)).is_err());
    }

    #[test]
    fn album_flattens_item_fields() {
        let now = chrono::Utc::now();
        let album = Album {
            item: ContentItem {
                id: 7,
                category: ContentCategory::Gallery,
                department: "Engineering".into(),
                title: "Convocation 2023".into(),
                fields: Map::new(),
                link: None,
                file: None,
                display_order: 0,
                created_at: now,
                updated_at: now,
            },
            photos: vec![],
        };
        let json = serde_json::to_value(&album).unwrap();
        assert_eq!(json["title"], "Convocation 2023");
        assert_eq!(json["category"], "gallery");
        assert!(json["photos"].as_array().unwrap().is_empty());
    }
}
