use campus_core::overview::DepartmentOverview;
use campus_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `department_overviews` table.
#[derive(Debug, Clone, FromRow)]
pub struct DepartmentOverviewRow {
    pub id: DbId,
    pub department: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<DepartmentOverviewRow> for DepartmentOverview {
    fn from(row: DepartmentOverviewRow) -> Self {
        DepartmentOverview {
            department: row.department,
            description: row.description,
            updated_at: row.updated_at,
        }
    }
}
