//! Repository for the `department_overviews` table.

use campus_core::overview::DepartmentOverview;
use sqlx::PgPool;

use crate::models::department_overview::DepartmentOverviewRow;

const COLUMNS: &str = "id, department, description, created_at, updated_at";

pub struct OverviewRepo;

impl OverviewRepo {
    /// Returns `None` when the department has no overview yet.
    pub async fn find_by_department(
        pool: &PgPool,
        department: &str,
    ) -> Result<Option<DepartmentOverview>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM department_overviews WHERE department = $1");
        let row = sqlx::query_as::<_, DepartmentOverviewRow>(&query)
            .bind(department)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Insert or replace the overview of a department.
    ///
    /// Uses `ON CONFLICT (department) DO UPDATE` so repeated writes are idempotent.
    pub async fn upsert(
        pool: &PgPool,
        department: &str,
        description: &str,
    ) -> Result<DepartmentOverview, sqlx::Error> {
        let query = format!(
            "INSERT INTO department_overviews (department, description) \
             VALUES ($1, $2) \
             ON CONFLICT (department) DO UPDATE SET \
                 description = EXCLUDED.description \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, DepartmentOverviewRow>(&query)
            .bind(department)
            .bind(description)
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }
}
