use std::sync::Arc;

use campus_media::MediaStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything heavy sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: campus_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Where uploaded files go. Chosen by `MEDIA_BACKEND`.
    pub media: Arc<dyn MediaStore>,
}
