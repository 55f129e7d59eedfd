//! Request handlers.
//!
//! Content categories share one generic handler set in [`content`]; the
//! category arrives as a request extension installed by its router.
//! Handlers delegate to the repositories in `campus_db` and map errors via
//! [`AppError`](crate::error::AppError).

pub mod admin;
pub mod auth;
pub mod content;
pub mod department_overview;
pub mod departments;
pub mod gallery;
pub mod media;
