//! Admin form input state and client-side validation.
//!
//! Validation runs the same descriptor rules the server enforces, so most
//! mistakes are reported before a request is sent.

use campus_core::category::ContentCategory;
use campus_core::content::{validate_title, ContentItem, ContentPayload};
use campus_core::media::ResourceKind;
use campus_core::types::DbId;
use serde_json::{Map, Value};

use crate::error::ClientError;

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInput {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileInput {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Build an input whose content type is guessed from the file name.
    pub fn from_file_name(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = ResourceKind::guess_content_type(&file_name)
            .unwrap_or("application/octet-stream")
            .to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn kind(&self) -> Option<ResourceKind> {
        ResourceKind::from_content_type(&self.content_type)
    }
}

/// Input state of the admin form of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentForm {
    category: ContentCategory,
    /// Record being edited; `None` while composing a new one.
    editing: Option<DbId>,
    /// Whether the edited record already carries a file or link.
    has_attachment: bool,
    pub title: String,
    pub fields: Map<String, Value>,
    pub link: String,
    pub file: Option<FileInput>,
    pub display_order: Option<i32>,
}

impl ContentForm {
    pub fn new(category: ContentCategory) -> Self {
        Self {
            category,
            editing: None,
            has_attachment: false,
            title: String::new(),
            fields: Map::new(),
            link: String::new(),
            file: None,
            display_order: None,
        }
    }

    /// Start editing an existing record.
    ///
    /// The attachment inputs start empty; leaving them empty keeps the
    /// stored file or link.
    pub fn edit(item: &ContentItem) -> Self {
        Self {
            editing: Some(item.id),
            has_attachment: item.has_attachment(),
            title: item.title.clone(),
            fields: item.fields.clone(),
            display_order: Some(item.display_order),
            ..Self::new(item.category)
        }
    }

    pub fn category(&self) -> ContentCategory {
        self.category
    }

    pub fn editing(&self) -> Option<DbId> {
        self.editing
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) {
        self.fields.insert(name.to_string(), value.into());
    }

    /// Check the form against its category's rules.
    pub fn validate(&self) -> Result<(), ClientError> {
        let descriptor = self.category.descriptor();

        validate_title(&self.title)?;
        descriptor.validate_fields(&self.fields)?;

        let file_kind = match &self.file {
            Some(file) => Some(file.kind().ok_or_else(|| {
                ClientError::Validation(format!(
                    "Unsupported file type '{}' for '{}'",
                    file.content_type, file.file_name
                ))
            })?),
            None => None,
        };

        descriptor.validate_attachment(
            file_kind,
            self.link_value(),
            self.editing.is_some() && self.has_attachment,
        )?;
        Ok(())
    }

    /// The submission body for `department`. The file travels separately.
    pub fn to_payload(&self, department: &str) -> ContentPayload {
        let descriptor = self.category.descriptor();
        ContentPayload {
            department: Some(department.to_string()),
            title: Some(self.title.trim().to_string()),
            fields: Some(descriptor.normalize_fields(self.fields.clone())),
            link: self.link_value().map(str::to_string),
            display_order: self.display_order,
        }
    }

    /// Reset every input, leaving edit mode.
    pub fn clear(&mut self) {
        *self = Self::new(self.category);
    }

    fn link_value(&self) -> Option<&str> {
        let link = self.link.trim();
        (!link.is_empty()).then_some(link)
    }
}
