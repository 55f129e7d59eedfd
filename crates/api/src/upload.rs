//! Request body extractors for content submissions.
//!
//! Admin forms send JSON when no file is attached and `multipart/form-data`
//! when one is. Both shapes are folded into a [`ContentPayload`] plus an
//! optional [`UploadedFile`], so handlers never care which one arrived.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use campus_core::category::ContentCategory;
use campus_core::content::{ContentPayload, PhotoPayload};
use campus_core::error::CoreError;
use campus_core::media::ResourceKind;
use campus_media::MediaUpload;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::state::AppState;

/// A file part that passed type checks.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub kind: ResourceKind,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn into_upload(self, department: &str, category: ContentCategory) -> MediaUpload {
        MediaUpload {
            department: department.to_string(),
            category: category.slug().to_string(),
            file_name: self.file_name,
            content_type: self.content_type,
            kind: self.kind,
            bytes: self.bytes,
        }
    }
}

/// Body of `POST /api/<category>` and `PUT /api/<category>/<id>`.
///
/// Reads the category from the request extensions, where each category
/// router installs it, so multipart parts can be matched to descriptor
/// fields.
#[derive(Debug)]
pub struct ContentSubmission {
    pub payload: ContentPayload,
    pub file: Option<UploadedFile>,
}

impl FromRequest<AppState> for ContentSubmission {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let category = req
            .extensions()
            .get::<ContentCategory>()
            .copied()
            .ok_or_else(|| AppError::InternalError("Content route without a category".into()))?;

        if is_multipart(&req) {
            let multipart = Multipart::from_request(req, state).await?;
            read_content_form(category, multipart).await
        } else {
            let Json(payload) = Json::<ContentPayload>::from_request(req, state).await?;
            Ok(ContentSubmission {
                payload: payload.normalized(),
                file: None,
            })
        }
    }
}

/// Body of `POST /api/gallery/<albumId>/photos`. Multipart only; the file
/// part is required.
#[derive(Debug)]
pub struct PhotoSubmission {
    pub payload: PhotoPayload,
    pub file: UploadedFile,
}

impl FromRequest<AppState> for PhotoSubmission {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            return Err(AppError::BadRequest(
                "Photos must be uploaded as multipart/form-data".into(),
            ));
        }
        let mut multipart = Multipart::from_request(req, state).await?;

        let mut payload = PhotoPayload::default();
        let mut file = None;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "file" => file = read_file(field).await?,
                "caption" => {
                    let caption = read_text(field).await?;
                    payload.caption = Some(caption).filter(|c| !c.trim().is_empty());
                }
                "displayOrder" => {
                    payload.display_order = parse_display_order(&read_text(field).await?)?;
                }
                _ => {}
            }
        }

        let file = file
            .ok_or_else(|| AppError::Core(CoreError::Validation("A photo file is required".into())))?;
        Ok(PhotoSubmission { payload, file })
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

async fn read_content_form(
    category: ContentCategory,
    mut multipart: Multipart,
) -> AppResult<ContentSubmission> {
    let descriptor = category.descriptor();
    let mut payload = ContentPayload::default();
    let mut fields = Map::new();
    let mut saw_fields = false;
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "" => {}
            "file" => file = read_file(field).await?,
            "department" => payload.department = Some(read_text(field).await?),
            "title" | "name" => payload.title = Some(read_text(field).await?),
            "link" => payload.link = Some(read_text(field).await?),
            // The whole fields object as one JSON part; replaces the
            // stored fields even when empty.
            "fields" => {
                let raw = read_text(field).await?;
                let object: Map<String, Value> = serde_json::from_str(&raw).map_err(|e| {
                    CoreError::Validation(format!("'fields' must be a JSON object: {e}"))
                })?;
                fields.extend(object);
                saw_fields = true;
            }
            "displayOrder" => {
                payload.display_order = parse_display_order(&read_text(field).await?)?;
            }
            other => {
                let spec = descriptor.field(other).ok_or_else(|| {
                    CoreError::Validation(format!(
                        "Unknown field '{other}' for {}",
                        descriptor.slug
                    ))
                })?;
                let raw = read_text(field).await?;
                // Blank parts stay blank so required-field checks see them.
                let value = if raw.trim().is_empty() {
                    Value::String(raw)
                } else {
                    spec.kind.parse_form_value(spec.name, &raw)?
                };
                fields.insert(spec.name.to_string(), value);
                saw_fields = true;
            }
        }
    }

    if saw_fields {
        payload.fields = Some(fields);
    }

    Ok(ContentSubmission {
        payload: payload.normalized(),
        file,
    })
}

/// Read and classify a file part. An empty part (an untouched file input)
/// counts as no file.
async fn read_file(field: Field<'_>) -> AppResult<Option<UploadedFile>> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let declared = field
        .content_type()
        .map(str::to_string)
        .filter(|ct| !ct.is_empty() && ct != "application/octet-stream");
    let bytes = field.bytes().await.map_err(multipart_error)?;
    if bytes.is_empty() {
        return Ok(None);
    }

    let content_type = match declared {
        Some(ct) => ct,
        None => ResourceKind::guess_content_type(&file_name)
            .map(str::to_string)
            .ok_or_else(|| {
                CoreError::Validation(format!("Cannot determine the type of '{file_name}'"))
            })?,
    };

    let kind = ResourceKind::from_content_type(&content_type).ok_or_else(|| {
        CoreError::Validation(format!("Unsupported file type '{content_type}'"))
    })?;

    if kind == ResourceKind::Image && image::guess_format(&bytes).is_err() {
        return Err(CoreError::Validation(format!("'{file_name}' is not a valid image")).into());
    }

    Ok(Some(UploadedFile {
        file_name,
        content_type,
        kind,
        bytes: bytes.to_vec(),
    }))
}

async fn read_text(field: Field<'_>) -> AppResult<String> {
    field.text().await.map_err(multipart_error)
}

fn parse_display_order(raw: &str) -> AppResult<Option<i32>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| CoreError::Validation("displayOrder must be an integer".into()).into())
}

fn multipart_error(err: MultipartError) -> AppError {
    AppError::BadRequest(err.body_text())
}
