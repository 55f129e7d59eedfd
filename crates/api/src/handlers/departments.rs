//! Handlers for `/api/departments`.
//!
//! Listing is public (the site needs it for navigation); creating and
//! deleting departments requires a super admin.

use axum::extract::State;
use axum::http::StatusCode;
use campus_core::department::{validate_department_name, Department};
use campus_core::error::CoreError;
use campus_db::repositories::{ContentRepo, DepartmentRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::{Json, Path};
use crate::middleware::rbac::RequireSuperAdmin;
use crate::state::AppState;

/// Request body for `POST /api/departments`.
#[derive(Debug, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
}

/// GET /api/departments
pub async fn list_departments(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Department>>> {
    let departments = DepartmentRepo::list(&state.pool).await?;
    Ok(Json(departments))
}

/// POST /api/departments
pub async fn create_department(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Json(input): Json<CreateDepartmentRequest>,
) -> AppResult<(StatusCode, Json<Department>)> {
    validate_department_name(&input.name)?;
    let department = DepartmentRepo::create(&state.pool, &input.name).await?;

    tracing::info!(
        department = %department.name,
        user_id = admin.user_id,
        "Department created",
    );

    Ok((StatusCode::CREATED, Json(department)))
}

/// DELETE /api/departments/{name}
///
/// Refused with 409 while the department still owns content.
pub async fn delete_department(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(name): Path<String>,
) -> AppResult<StatusCode> {
    if !DepartmentRepo::exists(&state.pool, &name).await? {
        return Err(CoreError::not_found("Department", &name).into());
    }

    let content_count = ContentRepo::count_by_department(&state.pool, &name).await?;
    if content_count > 0 {
        return Err(CoreError::Conflict(format!(
            "Department '{name}' still owns {content_count} content item(s)"
        ))
        .into());
    }

    // Accounts still bound to it surface as a 409 from the foreign key.
    DepartmentRepo::delete(&state.pool, &name).await?;

    tracing::info!(department = %name, user_id = admin.user_id, "Department deleted");

    Ok(StatusCode::NO_CONTENT)
}
