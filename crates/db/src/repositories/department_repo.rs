//! Repository for the `departments` table.

use campus_core::department::Department;
use sqlx::PgPool;

use crate::models::department::DepartmentRow;

const COLUMNS: &str = "id, name, created_at, updated_at";

pub struct DepartmentRepo;

impl DepartmentRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<Department>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM departments ORDER BY name");
        let rows = sqlx::query_as::<_, DepartmentRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<Department>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM departments WHERE name = $1");
        let row = sqlx::query_as::<_, DepartmentRow>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    pub async fn exists(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM departments WHERE name = $1)")
                .bind(name)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// Insert a department. A duplicate name violates `uq_departments_name`.
    pub async fn create(pool: &PgPool, name: &str) -> Result<Department, sqlx::Error> {
        let query = format!("INSERT INTO departments (name) VALUES ($1) RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, DepartmentRow>(&query)
            .bind(name)
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }

    /// Delete a department by name. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while content or accounts still
    /// reference the department.
    pub async fn delete(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM departments WHERE name = $1")
            .bind(name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
