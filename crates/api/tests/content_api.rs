//! HTTP-level integration tests for the generic content endpoints
//! (`/api/<category>`): department scoping, validation, media handling and
//! department-level authorization.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use campus_core::media::FileRef;
use campus_db::repositories::MediaReferenceRepo;
use campus_media::{LocalMediaStore, MediaError, MediaStore, MediaUpload, StoredObject};
use common::{
    body_json, delete_auth, get, image_part, pdf_part, post_json_auth, post_multipart_auth,
    put_json_auth, send_multipart_auth, Part,
};
use serde_json::json;
use sqlx::PgPool;

async fn create_syllabus(
    test: &common::TestApp,
    token: &str,
    department: &str,
    title: &str,
) -> serde_json::Value {
    let response = post_multipart_auth(
        test.app(),
        "/api/syllabus",
        token,
        &[
            Part::Text("department", department),
            Part::Text("title", title),
            Part::Text("programme", "B.Tech CSE"),
            Part::Text("academicYear", "2024"),
            pdf_part("syllabus.pdf"),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Listing and scoping
// ---------------------------------------------------------------------------

/// A syllabus uploaded for Engineering is visible there and absent for Law.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_syllabus_is_scoped_to_its_department(pool: PgPool) {
    common::seed_department(&pool, "Engineering").await;
    common::seed_department(&pool, "Law").await;
    let test = common::build_test_app(pool);
    let token = common::super_admin_token(&test).await;

    let created = create_syllabus(&test, &token, "Engineering", "B.Tech CSE Syllabus 2024").await;
    assert_eq!(created["department"], "Engineering");
    assert_eq!(created["fields"]["academicYear"], "2024");

    let response = get(test.app(), "/api/syllabus?department=Engineering").await;
    assert_eq!(response.status(), StatusCode::OK);
    let items = body_json(response).await;
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "B.Tech CSE Syllabus 2024");

    let response = get(test.app(), "/api/syllabus?department=Law").await;
    let items = body_json(response).await;
    assert!(items.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_without_department_is_400(pool: PgPool) {
    let test = common::build_test_app(pool);

    let response = get(test.app(), "/api/faculty").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Query parameter 'department' is required");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_is_ordered_by_display_order(pool: PgPool) {
    common::seed_department(&pool, "Law").await;
    let test = common::build_test_app(pool);
    let token = common::super_admin_token(&test).await;

    for (name, order) in [("Dr. C", 2), ("Dr. A", 0), ("Dr. B", 1)] {
        let body = json!({
            "department": "Law",
            "name": name,
            "fields": { "designation": "Professor" },
            "displayOrder": order
        });
        let response = post_json_auth(test.app(), "/api/faculty", &token, body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let items = body_json(get(test.app(), "/api/faculty?department=Law").await).await;
    let titles: Vec<&str> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Dr. A", "Dr. B", "Dr. C"]);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_rejects_missing_required_field(pool: PgPool) {
    common::seed_department(&pool, "Law").await;
    let test = common::build_test_app(pool);
    let token = common::super_admin_token(&test).await;

    let body = json!({ "department": "Law", "title": "LL.B", "fields": { "duration": "3 years" } });
    let response = post_json_auth(test.app(), "/api/programmes", &token, body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Field 'level' is required");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_rejects_unknown_department(pool: PgPool) {
    let test = common::build_test_app(pool);
    let token = common::super_admin_token(&test).await;

    let body = json!({ "department": "Astrology", "title": "Stars", "fields": { "quote": "Hi" } });
    let response = post_json_auth(test.app(), "/api/testimonials", &token, body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Unknown department 'Astrology'");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_file_and_link_together_are_rejected(pool: PgPool) {
    common::seed_department(&pool, "Engineering").await;
    let test = common::build_test_app(pool);
    let token = common::super_admin_token(&test).await;

    let response = post_multipart_auth(
        test.app(),
        "/api/study-materials",
        &token,
        &[
            Part::Text("department", "Engineering"),
            Part::Text("title", "Thermodynamics notes"),
            Part::Text("link", "https://drive.example.edu/thermo"),
            pdf_part("thermo.pdf"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Provide either a file or a link, not both");
    assert!(test.stored_objects().await.is_empty(), "nothing may be uploaded");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_wrong_resource_kind_is_rejected(pool: PgPool) {
    common::seed_department(&pool, "Engineering").await;
    let test = common::build_test_app(pool);
    let token = common::super_admin_token(&test).await;

    let response = post_multipart_auth(
        test.app(),
        "/api/syllabus",
        &token,
        &[
            Part::Text("department", "Engineering"),
            Part::Text("title", "Not a document"),
            image_part("photo.png"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_link_only_submission_is_stored_without_file(pool: PgPool) {
    common::seed_department(&pool, "Engineering").await;
    let test = common::build_test_app(pool);
    let token = common::super_admin_token(&test).await;

    let body = json!({
        "department": "Engineering",
        "title": "Admission brochure",
        "link": "https://cdn.example.edu/brochure.pdf"
    });
    let response = post_json_auth(test.app(), "/api/quick-access", &token, body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["link"], "https://cdn.example.edu/brochure.pdf");
    assert!(json["file"].is_null());
}

// ---------------------------------------------------------------------------
// Media invariants
// ---------------------------------------------------------------------------

/// Created records carry url and deletion handle together, or neither.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_created_records_hold_complete_media_pairs(pool: PgPool) {
    common::seed_department(&pool, "Law").await;
    let test = common::build_test_app(pool);
    let token = common::super_admin_token(&test).await;

    let with_photo = post_multipart_auth(
        test.app(),
        "/api/faculty",
        &token,
        &[
            Part::Text("department", "Law"),
            Part::Text("name", "Dr. A. Rao"),
            Part::Text("designation", "Dean"),
            Part::Text("experienceYears", "21"),
            image_part("rao.png"),
        ],
    )
    .await;
    assert_eq!(with_photo.status(), StatusCode::CREATED);
    let with_photo = body_json(with_photo).await;
    assert!(with_photo["file"]["url"].is_string());
    assert!(with_photo["file"]["deletionHandle"].is_string());
    assert_eq!(with_photo["file"]["resourceKind"], "image");
    assert_eq!(with_photo["fields"]["experienceYears"], 21);

    let without_photo = post_json_auth(
        test.app(),
        "/api/faculty",
        &token,
        json!({ "department": "Law", "name": "Dr. B", "fields": { "designation": "Lecturer" } }),
    )
    .await;
    assert_eq!(without_photo.status(), StatusCode::CREATED);
    let without_photo = body_json(without_photo).await;
    assert!(without_photo["file"].is_null());

    assert_eq!(test.stored_objects().await.len(), 1);
}

/// Deleting a record releases its file; no reference to the handle remains.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_releases_file_and_reference(pool: PgPool) {
    common::seed_department(&pool, "Engineering").await;
    let test = common::build_test_app(pool.clone());
    let token = common::super_admin_token(&test).await;

    let created = create_syllabus(&test, &token, "Engineering", "Syllabus").await;
    let id = created["id"].as_i64().unwrap();
    let handle = created["file"]["deletionHandle"].as_str().unwrap().to_string();
    assert_eq!(test.stored_objects().await.len(), 1);

    let response = delete_auth(test.app(), &format!("/api/syllabus/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(test.stored_objects().await.is_empty());
    assert_eq!(MediaReferenceRepo::count_references(&pool, &handle).await.unwrap(), 0);

    let items = body_json(get(test.app(), "/api/syllabus?department=Engineering").await).await;
    assert!(items.as_array().unwrap().is_empty());
}

/// Replacing the file on update releases the old one.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_with_new_file_releases_old_file(pool: PgPool) {
    common::seed_department(&pool, "Engineering").await;
    let test = common::build_test_app(pool);
    let token = common::super_admin_token(&test).await;

    let created = create_syllabus(&test, &token, "Engineering", "Syllabus").await;
    let id = created["id"].as_i64().unwrap();
    let old_handle = created["file"]["deletionHandle"].as_str().unwrap().to_string();

    let response = send_multipart_auth(
        test.app(),
        Method::PUT,
        &format!("/api/syllabus/{id}"),
        &token,
        &[Part::Text("title", "Syllabus (revised)"), pdf_part("revised.pdf")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["title"], "Syllabus (revised)");
    assert_ne!(updated["file"]["deletionHandle"], old_handle.as_str());
    // Untouched fields survive a partial update.
    assert_eq!(updated["fields"]["programme"], "B.Tech CSE");

    let stored = test.stored_objects().await;
    assert_eq!(stored.len(), 1);
    assert_ne!(stored[0].handle, old_handle);
}

/// A `fields` JSON part replaces the stored fields, matching a JSON update.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_multipart_update_with_empty_fields_part_clears_fields(pool: PgPool) {
    common::seed_department(&pool, "Engineering").await;
    let test = common::build_test_app(pool);
    let token = common::super_admin_token(&test).await;

    let created = create_syllabus(&test, &token, "Engineering", "Syllabus").await;
    let id = created["id"].as_i64().unwrap();

    let response = send_multipart_auth(
        test.app(),
        Method::PUT,
        &format!("/api/syllabus/{id}"),
        &token,
        &[Part::Text("fields", "{}"), pdf_part("revised.pdf")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert!(updated["fields"].as_object().unwrap().is_empty());

    let response = send_multipart_auth(
        test.app(),
        Method::PUT,
        &format!("/api/syllabus/{id}"),
        &token,
        &[Part::Text("fields", "[1, 2]"), pdf_part("again.pdf")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_to_link_clears_file(pool: PgPool) {
    common::seed_department(&pool, "Engineering").await;
    let test = common::build_test_app(pool);
    let token = common::super_admin_token(&test).await;

    let created = create_syllabus(&test, &token, "Engineering", "Syllabus").await;
    let id = created["id"].as_i64().unwrap();

    let response = put_json_auth(
        test.app(),
        &format!("/api/syllabus/{id}"),
        &token,
        json!({ "link": "https://drive.example.edu/syllabus" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["link"], "https://drive.example.edu/syllabus");
    assert!(updated["file"].is_null());
    assert!(test.stored_objects().await.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_cannot_move_department(pool: PgPool) {
    common::seed_department(&pool, "Engineering").await;
    common::seed_department(&pool, "Law").await;
    let test = common::build_test_app(pool);
    let token = common::super_admin_token(&test).await;

    let created = create_syllabus(&test, &token, "Engineering", "Syllabus").await;
    let id = created["id"].as_i64().unwrap();

    let response = put_json_auth(
        test.app(),
        &format!("/api/syllabus/{id}"),
        &token,
        json!({ "department": "Law" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_of_other_category_id_is_404(pool: PgPool) {
    common::seed_department(&pool, "Engineering").await;
    let test = common::build_test_app(pool);
    let token = common::super_admin_token(&test).await;

    let created = create_syllabus(&test, &token, "Engineering", "Syllabus").await;
    let id = created["id"].as_i64().unwrap();

    let response = put_json_auth(
        test.app(),
        &format!("/api/faculty/{id}"),
        &token,
        json!({ "title": "Hijacked" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Department authorization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unauthenticated_create_is_401(pool: PgPool) {
    common::seed_department(&pool, "Law").await;
    let test = common::build_test_app(pool);

    let response = common::post_json(
        test.app(),
        "/api/testimonials",
        json!({ "department": "Law", "name": "Alumna", "fields": { "quote": "Great" } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A department admin cannot create, update or delete another department's content.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_department_admin_is_confined_to_own_department(pool: PgPool) {
    common::seed_department(&pool, "Engineering").await;
    common::seed_department(&pool, "Law").await;
    let test = common::build_test_app(pool);
    let super_token = common::super_admin_token(&test).await;
    let law_token = common::department_admin_token(&test, "law_admin", "Law").await;

    let eng_item = create_syllabus(&test, &super_token, "Engineering", "Syllabus").await;
    let eng_id = eng_item["id"].as_i64().unwrap();

    let body = json!({ "department": "Engineering", "name": "X", "fields": { "quote": "Y" } });
    let response = post_json_auth(test.app(), "/api/testimonials", &law_token, body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(
        test.app(),
        &format!("/api/syllabus/{eng_id}"),
        &law_token,
        json!({ "title": "Changed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(test.app(), &format!("/api/syllabus/{eng_id}"), &law_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Still there and untouched.
    let items = body_json(get(test.app(), "/api/syllabus?department=Engineering").await).await;
    assert_eq!(items[0]["title"], "Syllabus");

    // Own department works.
    let body = json!({ "department": "Law", "name": "Alumna", "fields": { "quote": "Great" } });
    let response = post_json_auth(test.app(), "/api/testimonials", &law_token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Media store failures
// ---------------------------------------------------------------------------

/// Stores files locally but refuses every delete.
struct FailingDeleteStore {
    inner: LocalMediaStore,
}

#[async_trait]
impl MediaStore for FailingDeleteStore {
    fn backend_tag(&self) -> &'static str {
        "failing"
    }

    async fn upload(&self, upload: MediaUpload) -> Result<FileRef, MediaError> {
        self.inner.upload(upload).await
    }

    async fn delete(&self, _deletion_handle: &str) -> Result<(), MediaError> {
        Err(MediaError::Backend("simulated outage".into()))
    }

    async fn list(&self) -> Result<Vec<StoredObject>, MediaError> {
        self.inner.list().await
    }
}

/// A media store failure during delete surfaces 502 and keeps the record.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_media_failure_on_delete_keeps_record(pool: PgPool) {
    common::seed_department(&pool, "Engineering").await;
    let media_dir = tempfile::TempDir::new().unwrap();
    let store = FailingDeleteStore {
        inner: LocalMediaStore::new(media_dir.path(), "http://localhost:3000/media"),
    };
    let test = common::build_test_app_with_media(pool, Arc::new(store));
    let token = common::super_admin_token(&test).await;

    let created = create_syllabus(&test, &token, "Engineering", "Syllabus").await;
    let id = created["id"].as_i64().unwrap();

    let response = delete_auth(test.app(), &format!("/api/syllabus/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "MEDIA_STORE_ERROR");
    assert!(json["details"].as_str().unwrap().contains("simulated outage"));

    let items = body_json(get(test.app(), "/api/syllabus?department=Engineering").await).await;
    assert_eq!(items.as_array().unwrap().len(), 1);
}
