//! `GET /health`, mounted outside `/api`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Active media backend (`local` or `s3`).
    pub media_backend: &'static str,
}

/// GET /health
///
/// 503 while the database is unreachable so load balancers drain the node.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_healthy = campus_db::health_check(&state.pool).await.is_ok();
    let status = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        media_backend: state.media.backend_tag(),
    };
    (status, Json(body))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
