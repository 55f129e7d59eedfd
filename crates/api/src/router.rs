//! Application router. `main` and the integration tests both build the
//! service through [`build_app_router`].

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use campus_media::MediaBackend;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::error::route_not_found;
use crate::routes;
use crate::state::AppState;

/// Build the application: `/health`, `/api`, local `/media` serving, and
/// the middleware stack.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let mut router = Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes())
        .fallback(route_not_found);

    // Public URLs of the local backend point back at this server.
    if config.media.backend == MediaBackend::Local {
        router = router.nest_service("/media", ServeDir::new(&config.media.root));
    }

    with_middleware(router, config).with_state(state)
}

/// Wrap `router` in the HTTP middleware. The last layer added runs first:
/// CORS, request id, tracing, response request id, timeout, panic
/// recovery, then the upload size cap closest to the handlers.
fn with_middleware(router: Router<AppState>, config: &ServerConfig) -> Router<AppState> {
    let request_id = HeaderName::from_static("x-request-id");
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));
    let timeout = TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(config.request_timeout_secs),
    );

    router
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(CatchPanicLayer::new())
        .layer(timeout)
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(trace)
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(build_cors_layer(config))
}

/// CORS for the configured site origins. Panics at startup on an invalid origin.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
