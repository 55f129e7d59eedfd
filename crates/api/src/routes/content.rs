//! Route definitions for the content categories.
//!
//! Every category gets the same four routes; the handlers learn which
//! category they serve from the [`ContentCategory`] extension installed on
//! its sub-router.

use axum::routing::{delete, get, put};
use axum::{Extension, Router};
use campus_core::category::ContentCategory;

use crate::handlers::{content, gallery};
use crate::state::AppState;

/// One sub-router per category, mounted at `/{slug}`.
pub fn router() -> Router<AppState> {
    ContentCategory::ALL
        .into_iter()
        .fold(Router::new(), |router, category| {
            router.nest(&format!("/{}", category.slug()), category_router(category))
        })
}

/// Routes mounted at `/{slug}`.
///
/// ```text
/// GET    /?department=<name>              -> list
/// POST   /                                -> create
/// PUT    /{id}                            -> update
/// DELETE /{id}                            -> delete
///
/// gallery only:
/// GET    /{id}/photos?department=<name>   -> list_photos
/// POST   /{id}/photos                     -> add_photo
/// DELETE /{id}/photos/{photo_id}          -> delete_photo
/// ```
///
/// The album id shares the `{id}` segment name with the item routes.
fn category_router(category: ContentCategory) -> Router<AppState> {
    let mut router = Router::new()
        .route("/", get(content::list).post(content::create))
        .route("/{id}", put(content::update).delete(content::delete));

    if category == ContentCategory::Gallery {
        router = router
            .route(
                "/{id}/photos",
                get(gallery::list_photos).post(gallery::add_photo),
            )
            .route("/{id}/photos/{photo_id}", delete(gallery::delete_photo));
    }

    router.layer(Extension(category))
}
