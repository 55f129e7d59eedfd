//! Media references: the link between a content record and a file held by
//! the external media store.
//!
//! A record may only reference a file it can later delete, so the public
//! URL and the deletion handle travel together or not at all.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Resource kinds
// ---------------------------------------------------------------------------

/// What kind of file a media reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Image,
    Video,
    Document,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Video => "video",
            ResourceKind::Document => "document",
        }
    }

    /// Classify a MIME type, or `None` when uploads of that type are refused.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        if IMAGE_MIME_TYPES.contains(&essence.as_str()) {
            Some(ResourceKind::Image)
        } else if VIDEO_MIME_TYPES.contains(&essence.as_str()) {
            Some(ResourceKind::Video)
        } else if DOCUMENT_MIME_TYPES.contains(&essence.as_str()) {
            Some(ResourceKind::Document)
        } else {
            None
        }
    }

    /// Guess a MIME type from a file name when the client sent none (or a
    /// generic `application/octet-stream`).
    pub fn guess_content_type(file_name: &str) -> Option<&'static str> {
        let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
        EXTENSION_MIME_TYPES
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, mime)| *mime)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(ResourceKind::Image),
            "video" => Ok(ResourceKind::Video),
            "document" => Ok(ResourceKind::Document),
            other => Err(CoreError::Validation(format!(
                "Unknown resource kind '{other}'"
            ))),
        }
    }
}

const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

const VIDEO_MIME_TYPES: &[&str] = &["video/mp4", "video/webm", "video/quicktime"];

const DOCUMENT_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
];

const EXTENSION_MIME_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("mov", "video/quicktime"),
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("ppt", "application/vnd.ms-powerpoint"),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
];

// ---------------------------------------------------------------------------
// File references
// ---------------------------------------------------------------------------

/// A file held by the media store, as embedded in content records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub url: String,
    pub deletion_handle: String,
    pub resource_kind: ResourceKind,
}

impl FileRef {
    /// Assemble a reference from the three nullable storage columns.
    ///
    /// Returns `Ok(None)` when all are absent and an error when only some are
    /// present, which would leave a file that can never be deleted.
    pub fn from_columns(
        url: Option<String>,
        deletion_handle: Option<String>,
        kind: Option<&str>,
    ) -> Result<Option<Self>, CoreError> {
        match (url, deletion_handle, kind) {
            (None, None, None) => Ok(None),
            (Some(url), Some(deletion_handle), Some(kind)) => Ok(Some(FileRef {
                url,
                deletion_handle,
                resource_kind: kind.parse()?,
            })),
            _ => Err(CoreError::Internal(
                "Media reference is partially populated".into(),
            )),
        }
    }
}

/// Validate a URL/handle pair coming from a media store.
pub fn validate_media_pair(url: &str, deletion_handle: &str) -> Result<(), CoreError> {
    if url.trim().is_empty() || deletion_handle.trim().is_empty() {
        return Err(CoreError::Validation(
            "Media store returned an empty URL or deletion handle".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn classifies_common_mime_types() {
        assert_eq!(
            ResourceKind::from_content_type("image/png"),
            Some(ResourceKind::Image)
        );
        assert_eq!(
            ResourceKind::from_content_type("application/pdf; charset=binary"),
            Some(ResourceKind::Document)
        );
        assert_eq!(
            ResourceKind::from_content_type("VIDEO/MP4"),
            Some(ResourceKind::Video)
        );
        assert_eq!(ResourceKind::from_content_type("application/zip"), None);
    }

    #[test]
    fn guesses_content_type_from_extension() {
        assert_eq!(
            ResourceKind::guess_content_type("Syllabus.PDF"),
            Some("application/pdf")
        );
        assert_eq!(ResourceKind::guess_content_type("noext"), None);
    }

    #[test]
    fn file_ref_requires_all_columns_together() {
        assert_matches!(FileRef::from_columns(None, None, None), Ok(None));

        let full = FileRef::from_columns(
            Some("https://cdn/x.pdf".into()),
            Some("engineering/x.pdf".into()),
            Some("document"),
        )
        .unwrap()
        .unwrap();
        assert_eq!(full.resource_kind, ResourceKind::Document);

        assert!(FileRef::from_columns(Some("https://cdn/x.pdf".into()), None, None).is_err());
        assert!(FileRef::from_columns(None, Some("handle".into()), Some("image")).is_err());
    }

    #[test]
    fn file_ref_serializes_camel_case() {
        let file = FileRef {
            url: "u".into(),
            deletion_handle: "h".into(),
            resource_kind: ResourceKind::Image,
        };
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["deletionHandle"], "h");
        assert_eq!(json["resourceKind"], "image");
    }
}
