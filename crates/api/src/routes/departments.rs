use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::departments;
use crate::state::AppState;

/// Routes mounted at `/departments`.
///
/// ```text
/// GET    /          -> list_departments (public)
/// POST   /          -> create_department (super admin)
/// DELETE /{name}    -> delete_department (super admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(departments::list_departments).post(departments::create_department),
        )
        .route("/{name}", delete(departments::delete_department))
}
