//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod content_repo;
pub mod department_repo;
pub mod media_reference_repo;
pub mod overview_repo;
pub mod photo_repo;
pub mod session_repo;
pub mod user_repo;

pub use content_repo::ContentRepo;
pub use department_repo::DepartmentRepo;
pub use media_reference_repo::MediaReferenceRepo;
pub use overview_repo::OverviewRepo;
pub use photo_repo::PhotoRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
