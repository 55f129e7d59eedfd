//! Generic handlers for every content category (`/api/<category>`).
//!
//! Each category router installs its [`ContentCategory`] as a request
//! extension, so one set of handlers serves syllabus, faculty, gallery and
//! the rest. Category rules come from the descriptor.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use campus_core::category::ContentCategory;
use campus_core::content::{validate_title, Album, ContentItem, ContentPayload};
use campus_core::department::validate_department_name;
use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_db::models::content_item::{AttachmentUpdate, CreateContentItem, UpdateContentItem};
use campus_db::repositories::{ContentRepo, DepartmentRepo, PhotoRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::handlers::media::{release_file, store_file};
use crate::middleware::auth::AuthUser;
use crate::query::DepartmentParams;
use crate::state::AppState;
use crate::upload::ContentSubmission;

/// Response of `GET /api/<category>`. Gallery lists carry nested photos.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ContentList {
    Items(Vec<ContentItem>),
    Albums(Vec<Album>),
}

/// GET /api/<category>?department=<name>
///
/// Public. Lists one department's items of the category in display order.
pub async fn list(
    State(state): State<AppState>,
    Extension(category): Extension<ContentCategory>,
    Query(params): Query<DepartmentParams>,
) -> AppResult<Json<ContentList>> {
    let department = params.require()?;
    let items = ContentRepo::list_by_department(&state.pool, category, &department).await?;

    if category == ContentCategory::Gallery {
        let albums = PhotoRepo::attach_to_albums(&state.pool, items).await?;
        return Ok(Json(ContentList::Albums(albums)));
    }
    Ok(Json(ContentList::Items(items)))
}

/// POST /api/<category>
///
/// Validates the submission, uploads the file (if any), then writes the
/// record. A failed write releases the uploaded file again.
pub async fn create(
    State(state): State<AppState>,
    Extension(category): Extension<ContentCategory>,
    user: AuthUser,
    ContentSubmission { payload, file }: ContentSubmission,
) -> AppResult<(StatusCode, Json<ContentItem>)> {
    let descriptor = category.descriptor();

    let department = payload
        .department
        .ok_or_else(|| CoreError::Validation("Department is required".into()))?;
    validate_department_name(&department)?;
    user.ensure_can_manage(&department)?;
    if !DepartmentRepo::exists(&state.pool, &department).await? {
        return Err(CoreError::Validation(format!("Unknown department '{department}'")).into());
    }

    let title = payload.title.unwrap_or_default().trim().to_string();
    validate_title(&title)?;

    let fields = payload.fields.unwrap_or_default();
    descriptor.validate_fields(&fields)?;
    let fields = descriptor.normalize_fields(fields);

    descriptor.validate_attachment(file.as_ref().map(|f| f.kind), payload.link.as_deref(), false)?;

    let file_ref = match file {
        Some(file) => Some(store_file(&state, &department, category, file).await?),
        None => None,
    };

    let input = CreateContentItem {
        category,
        department,
        title,
        fields,
        link: payload.link,
        file: file_ref,
        display_order: payload.display_order.unwrap_or(0),
    };

    let item = match ContentRepo::create(&state.pool, &input).await {
        Ok(item) => item,
        Err(e) => {
            if let Some(file) = &input.file {
                release_file(&state, &file.deletion_handle).await;
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        item_id = item.id,
        category = category.slug(),
        department = %item.department,
        user_id = user.user_id,
        "Content item created",
    );

    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/<category>/<id>
///
/// Partial update. `fields` is replaced wholesale when present. A new file
/// or link replaces the stored attachment; the old file is released after
/// the row is written.
pub async fn update(
    State(state): State<AppState>,
    Extension(category): Extension<ContentCategory>,
    user: AuthUser,
    Path(id): Path<DbId>,
    ContentSubmission { payload, file }: ContentSubmission,
) -> AppResult<Json<ContentItem>> {
    let descriptor = category.descriptor();

    let existing = ContentRepo::find_by_id(&state.pool, category, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Content item", id))?;
    user.ensure_can_manage(&existing.department)?;

    let ContentPayload {
        department,
        title,
        fields,
        link,
        display_order,
    } = payload;

    if department.is_some_and(|d| d != existing.department) {
        return Err(CoreError::Validation("Department cannot be changed".into()).into());
    }

    let title = title.map(|t| t.trim().to_string());
    if let Some(title) = &title {
        validate_title(title)?;
    }

    let fields = match fields {
        Some(fields) => {
            descriptor.validate_fields(&fields)?;
            Some(descriptor.normalize_fields(fields))
        }
        None => None,
    };

    descriptor.validate_attachment(
        file.as_ref().map(|f| f.kind),
        link.as_deref(),
        existing.has_attachment(),
    )?;

    let attachment = match (file, link) {
        (Some(file), _) => {
            AttachmentUpdate::File(store_file(&state, &existing.department, category, file).await?)
        }
        (None, Some(link)) => AttachmentUpdate::Link(link),
        (None, None) => AttachmentUpdate::Keep,
    };

    let input = UpdateContentItem {
        title,
        fields,
        display_order,
        attachment,
    };

    let updated = match ContentRepo::update(&state.pool, category, id, &input).await {
        Ok(Some(item)) => item,
        result => {
            if let AttachmentUpdate::File(file) = &input.attachment {
                release_file(&state, &file.deletion_handle).await;
            }
            return match result {
                Err(e) => Err(e.into()),
                _ => Err(CoreError::not_found("Content item", id).into()),
            };
        }
    };

    if input.attachment != AttachmentUpdate::Keep {
        if let Some(old) = &existing.file {
            let still_current = updated
                .file
                .as_ref()
                .is_some_and(|f| f.deletion_handle == old.deletion_handle);
            if !still_current {
                release_file(&state, &old.deletion_handle).await;
            }
        }
    }

    tracing::info!(
        item_id = id,
        category = category.slug(),
        department = %updated.department,
        user_id = user.user_id,
        "Content item updated",
    );

    Ok(Json(updated))
}

/// DELETE /api/<category>/<id>
///
/// Releases every referenced file first. If the media store refuses, the
/// request fails with 502 and the record stays. For albums, each photo's
/// file and row go before the cover and the album row.
pub async fn delete(
    State(state): State<AppState>,
    Extension(category): Extension<ContentCategory>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = ContentRepo::find_by_id(&state.pool, category, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Content item", id))?;
    user.ensure_can_manage(&existing.department)?;

    if category == ContentCategory::Gallery {
        for photo in PhotoRepo::list_by_album(&state.pool, id).await? {
            state.media.delete(&photo.file.deletion_handle).await?;
            PhotoRepo::delete(&state.pool, photo.id).await?;
        }
    }

    if let Some(file) = &existing.file {
        state.media.delete(&file.deletion_handle).await?;
    }

    if !ContentRepo::delete(&state.pool, category, id).await? {
        return Err(AppError::Core(CoreError::not_found("Content item", id)));
    }

    tracing::info!(
        item_id = id,
        category = category.slug(),
        department = %existing.department,
        user_id = user.user_id,
        "Content item deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}
