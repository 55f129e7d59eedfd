use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_api::background;
use campus_api::bootstrap::ensure_super_admin;
use campus_api::config::ServerConfig;
use campus_api::router::build_app_router;
use campus_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = campus_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    campus_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    campus_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    if let Some(admin) = &config.bootstrap_admin {
        ensure_super_admin(&pool, admin)
            .await
            .expect("Failed to provision bootstrap super admin");
    }

    // --- Media store ---
    let media = config
        .media
        .build_store()
        .await
        .expect("Failed to initialise media store");
    tracing::info!(backend = media.backend_tag(), "Media store ready");

    // --- Background jobs ---
    let cancel = CancellationToken::new();
    let mut jobs = Vec::new();

    if config.reconcile.enabled {
        jobs.push(tokio::spawn(background::media_reconciliation::run(
            pool.clone(),
            Arc::clone(&media),
            config.reconcile.clone(),
            cancel.clone(),
        )));
    } else {
        tracing::info!("Media reconciliation disabled");
    }

    jobs.push(tokio::spawn(background::session_cleanup::run(
        pool.clone(),
        cancel.clone(),
    )));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        media,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cancel.cancel();
    let wait = Duration::from_secs(config.shutdown_timeout_secs);
    for job in jobs {
        if tokio::time::timeout(wait, job).await.is_err() {
            tracing::warn!("Background job did not stop in time");
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
