use axum::routing::get;
use axum::Router;

use crate::handlers::department_overview;
use crate::state::AppState;

/// Routes mounted at `/department-overview`.
///
/// ```text
/// GET    /?department=<name>  -> get_overview
/// POST   /                    -> upsert_overview
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(department_overview::get_overview).post(department_overview::upsert_overview),
    )
}
