pub mod admin;
pub mod auth;
pub mod content;
pub mod department_overview;
pub mod departments;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/me                                         current user (requires auth)
///
/// /admin/users                                     list, create (super admin)
/// /admin/users/{id}                                deactivate (super admin)
/// /admin/users/{id}/password                       set password (super admin)
///
/// /departments                                     list (public), create (super admin)
/// /departments/{name}                              delete (super admin)
///
/// /department-overview?department=<name>           get (public)
/// /department-overview                             upsert (department scoped)
///
/// /{category}?department=<name>                    list (public)
/// /{category}                                      create (department scoped)
/// /{category}/{id}                                 update, delete (department scoped)
///
/// /gallery/{album_id}/photos?department=<name>     list (public)
/// /gallery/{album_id}/photos                       add (department scoped)
/// /gallery/{album_id}/photos/{photo_id}            delete (department scoped)
/// ```
///
/// `{category}` is one of `syllabus`, `achievements`, `gallery`, `faculty`,
/// `testimonials`, `programmes`, `study-materials`, `quick-access`,
/// `carousel`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/departments", departments::router())
        .nest("/department-overview", department_overview::router())
        .merge(content::router())
}
