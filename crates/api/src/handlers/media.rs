//! Helpers shared by handlers that move files in and out of the media store.

use campus_core::category::ContentCategory;
use campus_core::media::{validate_media_pair, FileRef};

use crate::error::AppResult;
use crate::state::AppState;
use crate::upload::UploadedFile;

/// Upload a file for `department`/`category` and check the returned pair.
pub async fn store_file(
    state: &AppState,
    department: &str,
    category: ContentCategory,
    file: UploadedFile,
) -> AppResult<FileRef> {
    let file_ref = state
        .media
        .upload(file.into_upload(department, category))
        .await?;

    if let Err(e) = validate_media_pair(&file_ref.url, &file_ref.deletion_handle) {
        release_file(state, &file_ref.deletion_handle).await;
        return Err(e.into());
    }

    tracing::debug!(
        handle = %file_ref.deletion_handle,
        backend = state.media.backend_tag(),
        "Stored media file",
    );
    Ok(file_ref)
}

/// Best-effort delete used for compensation and for replaced files.
///
/// Failures are logged and left for the reconciliation sweep.
pub async fn release_file(state: &AppState, deletion_handle: &str) {
    if let Err(e) = state.media.delete(deletion_handle).await {
        tracing::warn!(
            handle = %deletion_handle,
            error = %e,
            "Failed to release media file; leaving it to reconciliation",
        );
    }
}
