//! REST client for the campus content API.
//!
//! Wraps every `/api` route with [`reqwest`]. Non-2xx responses become
//! [`ClientError::Server`] carrying the decoded error body.

use std::time::Duration;

use campus_core::category::ContentCategory;
use campus_core::content::{Album, ContentItem, ContentPayload, Photo, PhotoPayload};
use campus_core::department::Department;
use campus_core::overview::{DepartmentOverview, UpsertOverview};
use campus_core::types::DbId;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::ClientConfig;
use crate::error::{parse_error_body, ClientError};
use crate::form::FileInput;

/// Public user info returned by login, refresh and `/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub role: String,
    pub department: Option<String>,
}

/// Body of a successful login or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// HTTP client for one campus API server.
///
/// Cheap to clone; clones share the connection pool. Mutating calls need
/// an access token, see [`CampusApi::with_token`].
#[derive(Debug, Clone)]
pub struct CampusApi {
    client: reqwest::Client,
    api_url: String,
    access_token: Option<String>,
}

impl CampusApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config.api_url.clone()))
    }

    /// Build a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_token: None,
        }
    }

    /// A copy of this client that sends `token` as its bearer token.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            ..self.clone()
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    // ---- content ----

    /// `GET /api/<category>?department=<name>`
    pub async fn list(
        &self,
        category: ContentCategory,
        department: &str,
    ) -> Result<Vec<ContentItem>, ClientError> {
        self.fetch_list(category, department).await
    }

    /// Gallery listing with each album's photos.
    pub async fn list_albums(&self, department: &str) -> Result<Vec<Album>, ClientError> {
        self.fetch_list(ContentCategory::Gallery, department).await
    }

    pub(crate) async fn fetch_list<T: DeserializeOwned>(
        &self,
        category: ContentCategory,
        department: &str,
    ) -> Result<Vec<T>, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/{}", category.slug())))
            .query(&[("department", department)])
            .send()
            .await?;

        parse_json(response).await
    }

    /// `POST /api/<category>`, multipart when `file` is present.
    pub async fn create(
        &self,
        category: ContentCategory,
        payload: &ContentPayload,
        file: Option<&FileInput>,
    ) -> Result<ContentItem, ClientError> {
        let request = self.client.post(self.url(&format!("/{}", category.slug())));
        let response = self
            .authorized(content_body(request, payload, file)?)?
            .send()
            .await?;

        parse_json(response).await
    }

    /// `PUT /api/<category>/<id>`, multipart when `file` is present.
    pub async fn update(
        &self,
        category: ContentCategory,
        id: DbId,
        payload: &ContentPayload,
        file: Option<&FileInput>,
    ) -> Result<ContentItem, ClientError> {
        let request = self
            .client
            .put(self.url(&format!("/{}/{id}", category.slug())));
        let response = self
            .authorized(content_body(request, payload, file)?)?
            .send()
            .await?;

        parse_json(response).await
    }

    /// `DELETE /api/<category>/<id>`
    pub async fn delete(&self, category: ContentCategory, id: DbId) -> Result<(), ClientError> {
        let request = self
            .client
            .delete(self.url(&format!("/{}/{id}", category.slug())));
        let response = self.authorized(request)?.send().await?;

        check_status(response).await
    }

    // ---- gallery photos ----

    /// `GET /api/gallery/<albumId>/photos?department=<name>`
    pub async fn list_photos(
        &self,
        department: &str,
        album_id: DbId,
    ) -> Result<Vec<Photo>, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/gallery/{album_id}/photos")))
            .query(&[("department", department)])
            .send()
            .await?;

        parse_json(response).await
    }

    pub async fn add_photo(
        &self,
        album_id: DbId,
        payload: &PhotoPayload,
        file: &FileInput,
    ) -> Result<Photo, ClientError> {
        let mut form = Form::new();
        if let Some(caption) = &payload.caption {
            form = form.text("caption", caption.clone());
        }
        if let Some(order) = payload.display_order {
            form = form.text("displayOrder", order.to_string());
        }
        let form = form.part("file", file_part(file)?);

        let request = self
            .client
            .post(self.url(&format!("/gallery/{album_id}/photos")))
            .multipart(form);
        let response = self.authorized(request)?.send().await?;

        parse_json(response).await
    }

    pub async fn delete_photo(&self, album_id: DbId, photo_id: DbId) -> Result<(), ClientError> {
        let request = self
            .client
            .delete(self.url(&format!("/gallery/{album_id}/photos/{photo_id}")));
        let response = self.authorized(request)?.send().await?;

        check_status(response).await
    }

    // ---- department overview ----

    /// Returns `Ok(None)` when the department has no overview yet.
    pub async fn get_overview(
        &self,
        department: &str,
    ) -> Result<Option<DepartmentOverview>, ClientError> {
        let response = self
            .client
            .get(self.url("/department-overview"))
            .query(&[("department", department)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        parse_json(response).await.map(Some)
    }

    pub async fn upsert_overview(
        &self,
        body: &UpsertOverview,
    ) -> Result<DepartmentOverview, ClientError> {
        let request = self.client.post(self.url("/department-overview")).json(body);
        let response = self.authorized(request)?.send().await?;

        parse_json(response).await
    }

    // ---- departments ----

    pub async fn list_departments(&self) -> Result<Vec<Department>, ClientError> {
        let response = self.client.get(self.url("/departments")).send().await?;
        parse_json(response).await
    }

    // ---- auth ----

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;

        parse_json(response).await
    }

    /// Exchange a refresh token for a new token pair. The old refresh
    /// token stops working.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, ClientError> {
        let response = self
            .client
            .post(self.url("/auth/refresh"))
            .json(&json!({ "refreshToken": refresh_token }))
            .send()
            .await?;

        parse_json(response).await
    }

    /// Revoke every session of the signed-in user.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let request = self.client.post(self.url("/auth/logout"));
        let response = self.authorized(request)?.send().await?;

        check_status(response).await
    }

    pub async fn me(&self) -> Result<UserInfo, ClientError> {
        let request = self.client.get(self.url("/auth/me"));
        let response = self.authorized(request)?.send().await?;

        parse_json(response).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.api_url)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or(ClientError::NotAuthenticated)?;
        Ok(request.bearer_auth(token))
    }
}

/// Attach a content submission as JSON, or as multipart when a file goes along.
fn content_body(
    request: RequestBuilder,
    payload: &ContentPayload,
    file: Option<&FileInput>,
) -> Result<RequestBuilder, ClientError> {
    let Some(file) = file else {
        return Ok(request.json(payload));
    };

    let mut form = Form::new();
    if let Some(department) = &payload.department {
        form = form.text("department", department.clone());
    }
    if let Some(title) = &payload.title {
        form = form.text("title", title.clone());
    }
    if let Some(link) = &payload.link {
        form = form.text("link", link.clone());
    }
    if let Some(order) = payload.display_order {
        form = form.text("displayOrder", order.to_string());
    }
    if let Some(fields) = &payload.fields {
        form = form.text("fields", serde_json::to_string(fields)?);
    }

    Ok(request.multipart(form.part("file", file_part(file)?)))
}

fn file_part(file: &FileInput) -> Result<Part, ClientError> {
    Ok(Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(&file.content_type)?)
}

/// Turn a non-2xx response into [`ClientError::Server`].
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let body = parse_error_body(status.as_u16(), &text);
    tracing::debug!(status = status.as_u16(), error = %body.error, "API request failed");

    Err(ClientError::Server {
        status: status.as_u16(),
        body,
    })
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}

async fn check_status(response: Response) -> Result<(), ClientError> {
    ensure_success(response).await?;
    Ok(())
}
