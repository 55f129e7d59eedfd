//! Content categories and their descriptors.
//!
//! Every category (syllabus, faculty, gallery, ...) is the same
//! department-scoped resource with a different field list and attachment
//! policy. The descriptor table below is the single place those differences
//! live; the API, the repositories and the client SDK all read from it.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::media::ResourceKind;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentCategory {
    Syllabus,
    Achievements,
    Gallery,
    Faculty,
    Testimonials,
    Programmes,
    StudyMaterials,
    QuickAccess,
    Carousel,
}

impl ContentCategory {
    pub const ALL: [ContentCategory; 9] = [
        ContentCategory::Syllabus,
        ContentCategory::Achievements,
        ContentCategory::Gallery,
        ContentCategory::Faculty,
        ContentCategory::Testimonials,
        ContentCategory::Programmes,
        ContentCategory::StudyMaterials,
        ContentCategory::QuickAccess,
        ContentCategory::Carousel,
    ];

    /// URL path segment and the value stored in `content_items.category`.
    pub fn slug(self) -> &'static str {
        self.descriptor().slug
    }

    pub fn descriptor(self) -> &'static CategoryDescriptor {
        match self {
            ContentCategory::Syllabus => &SYLLABUS,
            ContentCategory::Achievements => &ACHIEVEMENTS,
            ContentCategory::Gallery => &GALLERY,
            ContentCategory::Faculty => &FACULTY,
            ContentCategory::Testimonials => &TESTIMONIALS,
            ContentCategory::Programmes => &PROGRAMMES,
            ContentCategory::StudyMaterials => &STUDY_MATERIALS,
            ContentCategory::QuickAccess => &QUICK_ACCESS,
            ContentCategory::Carousel => &CAROUSEL,
        }
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ContentCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentCategory::ALL
            .into_iter()
            .find(|c| c.slug() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown content category '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Descriptor types
// ---------------------------------------------------------------------------

/// Value type of a category-specific field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line text, at most [`MAX_TEXT_LEN`] characters.
    Text,
    /// Free text, at most [`MAX_LONG_TEXT_LEN`] characters.
    LongText,
    /// Non-negative integer.
    Integer,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    Email,
    Url,
}

pub const MAX_TEXT_LEN: usize = 500;
pub const MAX_LONG_TEXT_LEN: usize = 10_000;

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// camelCase key inside the record's `fields` object.
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// How a category relates to uploaded files and external links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaPolicy {
    /// A file may be attached.
    Optional,
    /// A file must be attached.
    Required,
    /// Either a file or an external link, never both. `required` demands one.
    FileOrLink { required: bool },
}

#[derive(Debug)]
pub struct CategoryDescriptor {
    pub slug: &'static str,
    /// Plural label used in listings and empty states ("No syllabus entries yet").
    pub label: &'static str,
    pub fields: &'static [FieldSpec],
    pub media: MediaPolicy,
    pub accepted_kinds: &'static [ResourceKind],
}

const fn field(name: &'static str, kind: FieldKind, required: bool) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required,
    }
}

// ---------------------------------------------------------------------------
// Descriptor table
// ---------------------------------------------------------------------------

static SYLLABUS: CategoryDescriptor = CategoryDescriptor {
    slug: "syllabus",
    label: "syllabus entries",
    fields: &[
        field("programme", FieldKind::Text, false),
        field("academicYear", FieldKind::Text, false),
    ],
    media: MediaPolicy::FileOrLink { required: true },
    accepted_kinds: &[ResourceKind::Document],
};

static ACHIEVEMENTS: CategoryDescriptor = CategoryDescriptor {
    slug: "achievements",
    label: "achievements",
    fields: &[
        field("description", FieldKind::LongText, true),
        field("achievedOn", FieldKind::Date, false),
    ],
    media: MediaPolicy::Optional,
    accepted_kinds: &[ResourceKind::Image],
};

static GALLERY: CategoryDescriptor = CategoryDescriptor {
    slug: "gallery",
    label: "albums",
    fields: &[
        field("description", FieldKind::LongText, false),
        field("eventDate", FieldKind::Date, false),
    ],
    media: MediaPolicy::Required,
    accepted_kinds: &[ResourceKind::Image],
};

static FACULTY: CategoryDescriptor = CategoryDescriptor {
    slug: "faculty",
    label: "faculty members",
    fields: &[
        field("designation", FieldKind::Text, true),
        field("qualification", FieldKind::Text, false),
        field("email", FieldKind::Email, false),
        field("specialization", FieldKind::Text, false),
        field("experienceYears", FieldKind::Integer, false),
    ],
    media: MediaPolicy::Optional,
    accepted_kinds: &[ResourceKind::Image],
};

static TESTIMONIALS: CategoryDescriptor = CategoryDescriptor {
    slug: "testimonials",
    label: "testimonials",
    fields: &[
        field("quote", FieldKind::LongText, true),
        field("details", FieldKind::Text, false),
    ],
    media: MediaPolicy::Optional,
    accepted_kinds: &[ResourceKind::Image],
};

static PROGRAMMES: CategoryDescriptor = CategoryDescriptor {
    slug: "programmes",
    label: "programmes",
    fields: &[
        field("duration", FieldKind::Text, true),
        field("level", FieldKind::Text, true),
        field("fees", FieldKind::Text, false),
        field("eligibility", FieldKind::LongText, false),
        field("intake", FieldKind::Integer, false),
    ],
    media: MediaPolicy::FileOrLink { required: false },
    accepted_kinds: &[ResourceKind::Document],
};

static STUDY_MATERIALS: CategoryDescriptor = CategoryDescriptor {
    slug: "study-materials",
    label: "study materials",
    fields: &[
        field("subject", FieldKind::Text, false),
        field("semester", FieldKind::Integer, false),
    ],
    media: MediaPolicy::FileOrLink { required: true },
    accepted_kinds: &[ResourceKind::Document],
};

static QUICK_ACCESS: CategoryDescriptor = CategoryDescriptor {
    slug: "quick-access",
    label: "quick-access items",
    fields: &[field("description", FieldKind::Text, false)],
    media: MediaPolicy::FileOrLink { required: true },
    accepted_kinds: &[ResourceKind::Document],
};

static CAROUSEL: CategoryDescriptor = CategoryDescriptor {
    slug: "carousel",
    label: "carousel slides",
    fields: &[field("caption", FieldKind::Text, false)],
    media: MediaPolicy::Required,
    accepted_kinds: &[ResourceKind::Image, ResourceKind::Video],
};

/// Resource kinds accepted for gallery photos.
pub const PHOTO_KINDS: &[ResourceKind] = &[ResourceKind::Image];

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("valid url regex"));

/// Validate that `link` is an absolute `http`/`https` URL.
pub fn validate_link(link: &str) -> Result<(), CoreError> {
    if URL_RE.is_match(link) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Link '{link}' must be an absolute http(s) URL"
        )))
    }
}

impl FieldKind {
    /// Convert a raw form value (multipart text part) to its JSON form.
    pub fn parse_form_value(self, name: &str, raw: &str) -> Result<Value, CoreError> {
        match self {
            FieldKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| CoreError::Validation(format!("Field '{name}' must be an integer"))),
            _ => Ok(Value::String(raw.to_string())),
        }
    }

    fn check(self, name: &str, value: &Value) -> Result<(), CoreError> {
        let type_error =
            |expected: &str| CoreError::Validation(format!("Field '{name}' must be {expected}"));

        if self == FieldKind::Integer {
            let n = value.as_i64().ok_or_else(|| type_error("an integer"))?;
            if n < 0 {
                return Err(type_error("a non-negative integer"));
            }
            return Ok(());
        }

        let s = value.as_str().ok_or_else(|| type_error("a string"))?;
        match self {
            FieldKind::Text if s.chars().count() > MAX_TEXT_LEN => Err(CoreError::Validation(
                format!("Field '{name}' must be at most {MAX_TEXT_LEN} characters"),
            )),
            FieldKind::LongText if s.chars().count() > MAX_LONG_TEXT_LEN => {
                Err(CoreError::Validation(format!(
                    "Field '{name}' must be at most {MAX_LONG_TEXT_LEN} characters"
                )))
            }
            FieldKind::Date => chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(|_| ())
                .map_err(|_| type_error("a date in YYYY-MM-DD format")),
            FieldKind::Email if !EMAIL_RE.is_match(s) => Err(type_error("an email address")),
            FieldKind::Url => validate_link(s),
            _ => Ok(()),
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

impl CategoryDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate a category-specific `fields` object.
    ///
    /// Unknown keys are rejected, required keys must be present and
    /// non-blank, and every present value must match its declared kind.
    /// Blank optional values are accepted (and dropped by [`Self::normalize_fields`]).
    pub fn validate_fields(&self, fields: &Map<String, Value>) -> Result<(), CoreError> {
        if let Some(unknown) = fields.keys().find(|k| self.field(k).is_none()) {
            return Err(CoreError::Validation(format!(
                "Unknown field '{unknown}' for {}",
                self.slug
            )));
        }

        for spec in self.fields {
            match fields.get(spec.name) {
                Some(v) if !is_blank(v) => spec.kind.check(spec.name, v)?,
                _ if spec.required => {
                    return Err(CoreError::Validation(format!(
                        "Field '{}' is required",
                        spec.name
                    )))
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Drop blank optional values so they are stored as absent.
    pub fn normalize_fields(&self, fields: Map<String, Value>) -> Map<String, Value> {
        fields.into_iter().filter(|(_, v)| !is_blank(v)).collect()
    }

    pub fn accepts_links(&self) -> bool {
        matches!(self.media, MediaPolicy::FileOrLink { .. })
    }

    pub fn requires_attachment(&self) -> bool {
        matches!(
            self.media,
            MediaPolicy::Required | MediaPolicy::FileOrLink { required: true }
        )
    }

    /// Validate the attachment of a submission.
    ///
    /// * `file_kind` - kind of the uploaded file, if any.
    /// * `link` - external link, if any.
    /// * `has_existing` - whether the stored record already carries a file or
    ///   link that stays in place when nothing new is submitted (updates).
    pub fn validate_attachment(
        &self,
        file_kind: Option<ResourceKind>,
        link: Option<&str>,
        has_existing: bool,
    ) -> Result<(), CoreError> {
        if file_kind.is_some() && link.is_some() {
            return Err(CoreError::Validation(
                "Provide either a file or a link, not both".into(),
            ));
        }

        if let Some(link) = link {
            if !self.accepts_links() {
                return Err(CoreError::Validation(format!(
                    "{} do not accept external links",
                    self.label
                )));
            }
            validate_link(link)?;
        }

        if let Some(kind) = file_kind {
            if !self.accepted_kinds.contains(&kind) {
                return Err(CoreError::Validation(format!(
                    "{} accept only {} files, got {kind}",
                    self.label,
                    kinds_list(self.accepted_kinds)
                )));
            }
        }

        if self.requires_attachment() && file_kind.is_none() && link.is_none() && !has_existing {
            let msg = if self.accepts_links() {
                "A file or a link is required"
            } else {
                "A file is required"
            };
            return Err(CoreError::Validation(msg.into()));
        }

        Ok(())
    }
}

fn kinds_list(kinds: &[ResourceKind]) -> String {
    kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join("/")
}
