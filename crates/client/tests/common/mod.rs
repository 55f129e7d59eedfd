//! Stub API server for client SDK tests.
//!
//! Serves canned responses shaped like the real API on an ephemeral port
//! and records every request it receives.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use campus_client::CampusApi;
use serde_json::{json, Value};

pub const GOOD_PASSWORD: &str = "correct-horse-battery";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Debug, Default)]
pub struct Stub {
    requests: Mutex<Vec<Recorded>>,
    fields_parts: Mutex<Vec<String>>,
}

impl Stub {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// Raw `fields` parts of the multipart updates received so far.
    pub fn fields_parts(&self) -> Vec<String> {
        self.fields_parts.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

/// Start the stub server and return an anonymous client pointed at it.
pub async fn spawn_stub() -> (CampusApi, Arc<Stub>) {
    let stub = Arc::new(Stub::default());

    let router = Router::new()
        .route("/api/syllabus", get(list_syllabus).post(create_syllabus))
        .route(
            "/api/syllabus/{id}",
            put(update_syllabus).delete(delete_syllabus),
        )
        .route("/api/faculty", get(broken_listing))
        .route("/api/achievements", get(empty_listing).post(forbidden))
        .route("/api/study-materials", get(empty_listing).post(slow_create))
        .route("/api/department-overview", get(no_overview))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/logout", post(logout))
        .layer(middleware::from_fn_with_state(stub.clone(), record))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let api = CampusApi::with_client(reqwest::Client::new(), format!("http://{addr}"));
    (api, stub)
}

pub fn item(id: i64, category: &str, title: &str, department: &str) -> Value {
    json!({
        "id": id,
        "category": category,
        "department": department,
        "title": title,
        "fields": {},
        "link": null,
        "file": {
            "url": "http://media.test/engineering/syllabus/1.pdf",
            "deletionHandle": "engineering/syllabus/1.pdf",
            "resourceKind": "document"
        },
        "displayOrder": 0,
        "createdAt": "2026-03-01T09:00:00Z",
        "updatedAt": "2026-03-01T09:00:00Z"
    })
}

fn error(status: StatusCode, message: &str, code: &str) -> Response {
    (
        status,
        Json(json!({ "error": message, "code": code, "details": null })),
    )
        .into_response()
}

fn auth_response(generation: u32) -> Value {
    json!({
        "accessToken": format!("access-{generation}"),
        "refreshToken": format!("refresh-{generation}"),
        "expiresIn": 900,
        "user": {
            "id": 1,
            "username": "eng_admin",
            "role": "department_admin",
            "department": "Engineering"
        }
    })
}

async fn record(State(stub): State<Arc<Stub>>, request: Request, next: Next) -> Response {
    let recorded = {
        let headers = request.headers();
        let header = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Recorded {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            content_type: header(CONTENT_TYPE),
            authorization: header(AUTHORIZATION),
        }
    };
    stub.requests.lock().unwrap().push(recorded);
    next.run(request).await
}

async fn list_syllabus(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("department").map(String::as_str) {
        Some("Engineering") => Json(json!([item(
            1,
            "syllabus",
            "B.Tech CSE Syllabus 2024",
            "Engineering"
        )]))
        .into_response(),
        Some(_) => Json(json!([])).into_response(),
        None => error(
            StatusCode::BAD_REQUEST,
            "Department is required",
            "VALIDATION_ERROR",
        ),
    }
}

async fn create_syllabus(headers: HeaderMap) -> Response {
    if !headers.contains_key(AUTHORIZATION) {
        return error(StatusCode::UNAUTHORIZED, "Missing token", "UNAUTHORIZED");
    }
    (
        StatusCode::CREATED,
        Json(item(1, "syllabus", "B.Tech CSE Syllabus 2024", "Engineering")),
    )
        .into_response()
}

async fn update_syllabus(
    State(stub): State<Arc<Stub>>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("fields") {
            let text = field.text().await.unwrap();
            stub.fields_parts.lock().unwrap().push(text);
        }
    }
    Json(item(id, "syllabus", "B.Tech CSE Syllabus 2024", "Engineering")).into_response()
}

async fn delete_syllabus(Path(id): Path<i64>) -> Response {
    if id == 99 {
        return error(
            StatusCode::BAD_GATEWAY,
            "The media store could not complete the request",
            "MEDIA_STORE_ERROR",
        );
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn broken_listing() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
}

async fn empty_listing() -> Json<Value> {
    Json(json!([]))
}

async fn forbidden() -> Response {
    error(
        StatusCode::FORBIDDEN,
        "Not allowed to manage content of department 'Engineering'",
        "FORBIDDEN",
    )
}

async fn slow_create() -> Response {
    tokio::time::sleep(Duration::from_millis(200)).await;
    (
        StatusCode::CREATED,
        Json(item(5, "study-materials", "Thermodynamics notes", "Engineering")),
    )
        .into_response()
}

async fn no_overview() -> Response {
    error(
        StatusCode::NOT_FOUND,
        "Department overview 'Law' not found",
        "NOT_FOUND",
    )
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == GOOD_PASSWORD {
        Json(auth_response(1)).into_response()
    } else {
        error(
            StatusCode::UNAUTHORIZED,
            "Invalid username or password",
            "UNAUTHORIZED",
        )
    }
}

async fn refresh(Json(body): Json<Value>) -> Response {
    if body["refreshToken"] == "refresh-1" {
        Json(auth_response(2)).into_response()
    } else {
        error(
            StatusCode::UNAUTHORIZED,
            "Invalid or expired refresh token",
            "UNAUTHORIZED",
        )
    }
}

async fn logout(headers: HeaderMap) -> Response {
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value.starts_with("Bearer access-") => StatusCode::NO_CONTENT.into_response(),
        _ => error(StatusCode::UNAUTHORIZED, "Missing token", "UNAUTHORIZED"),
    }
}
