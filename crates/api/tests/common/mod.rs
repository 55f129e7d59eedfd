#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use campus_api::auth::jwt::JwtConfig;
use campus_api::auth::password::hash_password;
use campus_api::config::{ReconcileConfig, ServerConfig};
use campus_api::router::build_app_router;
use campus_api::state::AppState;
use campus_core::roles::{ROLE_DEPARTMENT_ADMIN, ROLE_SUPER_ADMIN};
use campus_db::models::user::{CreateUser, User};
use campus_db::repositories::{DepartmentRepo, UserRepo};
use campus_media::{LocalMediaStore, MediaBackend, MediaConfig, MediaStore, StoredObject};

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Smallest byte string `image::guess_format` recognises as PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n%campus test\n";

/// Build a test `ServerConfig` with safe defaults and a local media root.
pub fn test_config(media_root: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        max_upload_bytes: 5 * 1024 * 1024,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        media: MediaConfig {
            backend: MediaBackend::Local,
            root: media_root.to_path_buf(),
            public_base_url: "http://localhost:3000/media".to_string(),
            s3: None,
        },
        reconcile: ReconcileConfig::default(),
        bootstrap_admin: None,
    }
}

/// The application under test plus handles to its pool and media store.
pub struct TestApp {
    pub pool: PgPool,
    pub media: Arc<dyn MediaStore>,
    router: Router,
    _media_dir: TempDir,
}

impl TestApp {
    /// A fresh router clone; `oneshot` consumes it.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub async fn stored_objects(&self) -> Vec<StoredObject> {
        self.media.list().await.expect("listing media should succeed")
    }
}

/// Build the full application router backed by a temporary local media store.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let media_dir = TempDir::new().expect("tempdir should be created");
    let media: Arc<dyn MediaStore> = Arc::new(LocalMediaStore::new(
        media_dir.path(),
        "http://localhost:3000/media",
    ));
    assemble(pool, media, media_dir)
}

/// Same as [`build_test_app`] but with a caller-supplied media store.
pub fn build_test_app_with_media(pool: PgPool, media: Arc<dyn MediaStore>) -> TestApp {
    let media_dir = TempDir::new().expect("tempdir should be created");
    assemble(pool, media, media_dir)
}

fn assemble(pool: PgPool, media: Arc<dyn MediaStore>, media_dir: TempDir) -> TestApp {
    let config = test_config(media_dir.path());
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        media: Arc::clone(&media),
    };
    TestApp {
        pool,
        media,
        router: build_app_router(state, &config),
        _media_dir: media_dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn json_auth(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    json_auth(app, Method::POST, uri, token, body).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    json_auth(app, Method::PUT, uri, token, body).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "campus-test-boundary";

/// One part of a `multipart/form-data` body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

pub fn image_part(file_name: &str) -> Part<'_> {
    Part::File {
        name: "file",
        file_name,
        content_type: "image/png",
        bytes: PNG_BYTES,
    }
}

pub fn pdf_part(file_name: &str) -> Part<'_> {
    Part::File {
        name: "file",
        file_name,
        content_type: "application/pdf",
        bytes: PDF_BYTES,
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn send_multipart_auth(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    parts: &[Part<'_>],
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}

pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    token: &str,
    parts: &[Part<'_>],
) -> Response<Body> {
    send_multipart_auth(app, Method::POST, uri, token, parts).await
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

pub async fn seed_department(pool: &PgPool, name: &str) {
    DepartmentRepo::create(pool, name)
        .await
        .expect("department creation should succeed");
}

/// Create an account directly in the database with [`TEST_PASSWORD`].
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    role: &str,
    department: Option<&str>,
) -> User {
    let input = CreateUser {
        username: username.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
        department: department.map(str::to_string),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Log in through the API and return the full auth response.
pub async fn login(app: Router, username: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/api/auth/login", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK, "login should succeed");
    body_json(response).await
}

pub async fn super_admin_token(test: &TestApp) -> String {
    create_user(&test.pool, "root", ROLE_SUPER_ADMIN, None).await;
    let json = login(test.app(), "root", TEST_PASSWORD).await;
    json["accessToken"].as_str().unwrap().to_string()
}

pub async fn department_admin_token(test: &TestApp, username: &str, department: &str) -> String {
    create_user(&test.pool, username, ROLE_DEPARTMENT_ADMIN, Some(department)).await;
    let json = login(test.app(), username, TEST_PASSWORD).await;
    json["accessToken"].as_str().unwrap().to_string()
}
