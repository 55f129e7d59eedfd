//! Repository for the `content_items` table.
//!
//! Every query is keyed by category, and listing is additionally keyed by
//! department: there is no "list everything" query.

use campus_core::category::ContentCategory;
use campus_core::content::ContentItem;
use campus_core::types::DbId;
use serde_json::Value;
use sqlx::PgPool;

use crate::models::content_item::{
    AttachmentUpdate, ContentItemRow, CreateContentItem, UpdateContentItem,
};
use crate::models::decode;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, category, department, title, fields, link_url, \
    media_url, media_deletion_handle, media_kind, display_order, \
    created_at, updated_at";

/// Provides data access for content items of every category.
pub struct ContentRepo;

impl ContentRepo {
    /// List one department's items of one category.
    ///
    /// Ordered by `display_order`, ties broken by insertion order.
    pub async fn list_by_department(
        pool: &PgPool,
        category: ContentCategory,
        department: &str,
    ) -> Result<Vec<ContentItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_items \
             WHERE category = $1 AND department = $2 \
             ORDER BY display_order ASC, id ASC"
        );
        sqlx::query_as::<_, ContentItemRow>(&query)
            .bind(category.slug())
            .bind(department)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn find_by_id(
        pool: &PgPool,
        category: ContentCategory,
        id: DbId,
    ) -> Result<Option<ContentItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content_items WHERE id = $1 AND category = $2");
        sqlx::query_as::<_, ContentItemRow>(&query)
            .bind(id)
            .bind(category.slug())
            .fetch_optional(pool)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn create(
        pool: &PgPool,
        input: &CreateContentItem,
    ) -> Result<ContentItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO content_items \
                 (category, department, title, fields, link_url, \
                  media_url, media_deletion_handle, media_kind, display_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        let file = input.file.as_ref();
        let row = sqlx::query_as::<_, ContentItemRow>(&query)
            .bind(input.category.slug())
            .bind(&input.department)
            .bind(&input.title)
            .bind(Value::Object(input.fields.clone()))
            .bind(&input.link)
            .bind(file.map(|f| f.url.as_str()))
            .bind(file.map(|f| f.deletion_handle.as_str()))
            .bind(file.map(|f| f.resource_kind.as_str()))
            .bind(input.display_order)
            .fetch_one(pool)
            .await?;
        decode(row)
    }

    /// Partially update an item.
    ///
    /// Uses `COALESCE` so only provided scalar fields change. When the
    /// attachment is replaced, link and file columns are written together so
    /// the record never holds both.
    pub async fn update(
        pool: &PgPool,
        category: ContentCategory,
        id: DbId,
        input: &UpdateContentItem,
    ) -> Result<Option<ContentItem>, sqlx::Error> {
        let query = format!(
            "UPDATE content_items SET \
                 title = COALESCE($3, title), \
                 fields = COALESCE($4, fields), \
                 display_order = COALESCE($5, display_order), \
                 link_url = CASE WHEN $6 THEN $7 ELSE link_url END, \
                 media_url = CASE WHEN $6 THEN $8 ELSE media_url END, \
                 media_deletion_handle = CASE WHEN $6 THEN $9 ELSE media_deletion_handle END, \
                 media_kind = CASE WHEN $6 THEN $10 ELSE media_kind END \
             WHERE id = $1 AND category = $2 \
             RETURNING {COLUMNS}"
        );

        let (replace, link, url, handle, kind) = match &input.attachment {
            AttachmentUpdate::Keep => (false, None, None, None, None),
            AttachmentUpdate::Link(link) => (true, Some(link.as_str()), None, None, None),
            AttachmentUpdate::File(file) => (
                true,
                None,
                Some(file.url.as_str()),
                Some(file.deletion_handle.as_str()),
                Some(file.resource_kind.as_str()),
            ),
        };

        sqlx::query_as::<_, ContentItemRow>(&query)
            .bind(id)
            .bind(category.slug())
            .bind(&input.title)
            .bind(input.fields.clone().map(Value::Object))
            .bind(input.display_order)
            .bind(replace)
            .bind(link)
            .bind(url)
            .bind(handle)
            .bind(kind)
            .fetch_optional(pool)
            .await?
            .map(decode)
            .transpose()
    }

    /// Delete an item by ID. Album photos go with it via `ON DELETE CASCADE`.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        category: ContentCategory,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM content_items WHERE id = $1 AND category = $2")
            .bind(id)
            .bind(category.slug())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count one department's items across all categories.
    pub async fn count_by_department(pool: &PgPool, department: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM content_items WHERE department = $1")
                .bind(department)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
