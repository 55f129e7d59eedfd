use campus_media::MediaConfig;

use crate::auth::jwt::JwtConfig;

/// Default request body limit: 25 MiB, enough for a scanned syllabus PDF.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except
/// `JWT_SECRET`, which must always be provided.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long background jobs get to stop after a shutdown signal (default: `5`).
    pub shutdown_timeout_secs: u64,
    /// Request body limit, which caps upload size (default: 25 MiB).
    pub max_upload_bytes: usize,
    pub jwt: JwtConfig,
    pub media: MediaConfig,
    pub reconcile: ReconcileConfig,
    /// First super admin, created at startup when no active one exists.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Settings for the periodic media reconciliation sweep.
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    pub enabled: bool,
    pub interval_secs: u64,
    /// Unreferenced objects younger than this are left alone.
    pub grace_hours: i64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 6 * 3600,
            grace_hours: 24,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                    |
    /// |---------------------------------|----------------------------|
    /// | `HOST`                          | `0.0.0.0`                  |
    /// | `PORT`                          | `3000`                     |
    /// | `CORS_ORIGINS`                  | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`         | `5`                        |
    /// | `MAX_UPLOAD_BYTES`              | `26214400`                 |
    /// | `MEDIA_RECONCILE_ENABLED`       | `true`                     |
    /// | `MEDIA_RECONCILE_INTERVAL_SECS` | `21600`                    |
    /// | `MEDIA_RECONCILE_GRACE_HOURS`   | `24`                       |
    /// | `BOOTSTRAP_ADMIN_USERNAME`      | (none)                     |
    /// | `BOOTSTRAP_ADMIN_PASSWORD`      | (none)                     |
    ///
    /// JWT and media settings are documented on [`JwtConfig::from_env`] and
    /// [`MediaConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on malformed numeric values or an invalid media configuration.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let jwt = JwtConfig::from_env();
        let media = MediaConfig::from_env().expect("Invalid media store configuration");

        let defaults = ReconcileConfig::default();
        let reconcile = ReconcileConfig {
            enabled: std::env::var("MEDIA_RECONCILE_ENABLED")
                .map(|v| !matches!(v.trim(), "0" | "false" | "no" | "off"))
                .unwrap_or(defaults.enabled),
            interval_secs: std::env::var("MEDIA_RECONCILE_INTERVAL_SECS")
                .ok()
                .map(|v| v.parse().expect("MEDIA_RECONCILE_INTERVAL_SECS must be a valid u64"))
                .unwrap_or(defaults.interval_secs),
            grace_hours: std::env::var("MEDIA_RECONCILE_GRACE_HOURS")
                .ok()
                .map(|v| v.parse().expect("MEDIA_RECONCILE_GRACE_HOURS must be a valid i64"))
                .unwrap_or(defaults.grace_hours),
        };

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_USERNAME"),
            std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) if !username.trim().is_empty() => Some(BootstrapAdmin {
                username: username.trim().to_string(),
                password,
            }),
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            max_upload_bytes,
            jwt,
            media,
            reconcile,
            bootstrap_admin,
        }
    }
}
