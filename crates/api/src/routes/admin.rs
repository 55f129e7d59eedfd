//! Route definitions for the `/admin` resource.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `super_admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /users                 -> list_users
/// POST   /users                 -> create_user
/// DELETE /users/{id}            -> deactivate_user
/// PUT    /users/{id}/password   -> set_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route("/users/{id}", delete(admin::deactivate_user))
        .route("/users/{id}/password", put(admin::set_password))
}
