//! Handlers for photos nested under gallery albums
//! (`/api/gallery/{album_id}/photos`).
//!
//! Adding or removing a photo never touches the album row itself.

use axum::extract::State;
use axum::http::StatusCode;
use campus_core::category::{ContentCategory, PHOTO_KINDS};
use campus_core::content::{ContentItem, Photo};
use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_db::models::album::CreatePhoto;
use campus_db::repositories::{ContentRepo, PhotoRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::handlers::media::{release_file, store_file};
use crate::middleware::auth::AuthUser;
use crate::query::DepartmentParams;
use crate::state::AppState;
use crate::upload::PhotoSubmission;

async fn find_album(state: &AppState, album_id: DbId) -> AppResult<ContentItem> {
    ContentRepo::find_by_id(&state.pool, ContentCategory::Gallery, album_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Album", album_id)))
}

/// GET /api/gallery/{album_id}/photos?department=<name>
///
/// An album outside the requested department is reported as missing.
pub async fn list_photos(
    State(state): State<AppState>,
    Path(album_id): Path<DbId>,
    Query(params): Query<DepartmentParams>,
) -> AppResult<Json<Vec<Photo>>> {
    let department = params.require()?;
    let album = find_album(&state, album_id).await?;
    if album.department != department {
        return Err(CoreError::not_found("Album", album_id).into());
    }
    let photos = PhotoRepo::list_by_album(&state.pool, album_id).await?;
    Ok(Json(photos))
}

/// POST /api/gallery/{album_id}/photos
///
/// Multipart with a required image `file` plus optional `caption` and
/// `displayOrder`.
pub async fn add_photo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(album_id): Path<DbId>,
    PhotoSubmission { payload, file }: PhotoSubmission,
) -> AppResult<(StatusCode, Json<Photo>)> {
    let album = find_album(&state, album_id).await?;
    user.ensure_can_manage(&album.department)?;

    if !PHOTO_KINDS.contains(&file.kind) {
        return Err(CoreError::Validation(format!(
            "Album photos must be images, got {}",
            file.kind
        ))
        .into());
    }

    let file_ref = store_file(&state, &album.department, ContentCategory::Gallery, file).await?;
    let input = CreatePhoto {
        album_id,
        caption: payload.caption,
        file: file_ref,
        display_order: payload.display_order.unwrap_or(0),
    };

    let photo = match PhotoRepo::create(&state.pool, &input).await {
        Ok(photo) => photo,
        Err(e) => {
            release_file(&state, &input.file.deletion_handle).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        album_id,
        photo_id = photo.id,
        department = %album.department,
        user_id = user.user_id,
        "Album photo added",
    );

    Ok((StatusCode::CREATED, Json(photo)))
}

/// DELETE /api/gallery/{album_id}/photos/{photo_id}
///
/// Releases the photo file first; a media store failure keeps the row.
pub async fn delete_photo(
    State(state): State<AppState>,
    user: AuthUser,
    Path((album_id, photo_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let album = find_album(&state, album_id).await?;
    user.ensure_can_manage(&album.department)?;

    let photo = PhotoRepo::find_in_album(&state.pool, album_id, photo_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Photo", photo_id))?;

    state.media.delete(&photo.file.deletion_handle).await?;
    PhotoRepo::delete(&state.pool, photo.id).await?;

    tracing::info!(
        album_id,
        photo_id,
        department = %album.department,
        user_id = user.user_id,
        "Album photo deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}
