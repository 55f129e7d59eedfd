//! Deletion handle layout: `{department-slug}/{category}/{uuid}.{ext}`.
//!
//! The same string is the object key in S3 and the relative path on disk,
//! so it must never escape the store root.

use uuid::Uuid;

use crate::error::MediaError;

const MAX_EXTENSION_LEN: usize = 8;

/// Build a fresh, unique handle for an upload.
pub fn new_handle(department: &str, category: &str, file_name: &str) -> String {
    let id = Uuid::now_v7();
    let dept = slugify(department);
    let category = slugify(category);
    match extension(file_name) {
        Some(ext) => format!("{dept}/{category}/{id}.{ext}"),
        None => format!("{dept}/{category}/{id}"),
    }
}

/// Reject handles that are empty, absolute, or could traverse directories.
pub fn validate_handle(handle: &str) -> Result<(), MediaError> {
    let valid = !handle.is_empty()
        && !handle.starts_with('/')
        && handle
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
        && handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'));
    if valid {
        Ok(())
    } else {
        Err(MediaError::InvalidHandle(handle.to_string()))
    }
}

/// Lowercase ASCII slug; anything else collapses to single dashes.
fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let trimmed = slug.trim_end_matches('-');
    if trimmed.is_empty() {
        "misc".to_string()
    } else {
        trimmed.to_string()
    }
}

fn extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
