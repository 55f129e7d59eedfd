//! Department rows.

use campus_core::department::Department;
use campus_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `departments` table.
#[derive(Debug, Clone, FromRow)]
pub struct DepartmentRow {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<DepartmentRow> for Department {
    fn from(row: DepartmentRow) -> Self {
        Department {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}
