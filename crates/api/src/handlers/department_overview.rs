//! Handlers for `/api/department-overview`.

use axum::extract::State;
use campus_core::department::validate_department_name;
use campus_core::error::CoreError;
use campus_core::overview::{validate_description, DepartmentOverview, UpsertOverview};
use campus_db::repositories::{DepartmentRepo, OverviewRepo};

use crate::error::AppResult;
use crate::extract::{Json, Query};
use crate::middleware::auth::AuthUser;
use crate::query::DepartmentParams;
use crate::state::AppState;

/// GET /api/department-overview?department=<name>
///
/// 404 until the department's overview has been written once.
pub async fn get_overview(
    State(state): State<AppState>,
    Query(params): Query<DepartmentParams>,
) -> AppResult<Json<DepartmentOverview>> {
    let department = params.require()?;
    let overview = OverviewRepo::find_by_department(&state.pool, &department)
        .await?
        .ok_or_else(|| CoreError::not_found("Department overview", &department))?;
    Ok(Json(overview))
}

/// POST /api/department-overview
///
/// Create or replace the overview of a department.
pub async fn upsert_overview(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpsertOverview>,
) -> AppResult<Json<DepartmentOverview>> {
    validate_department_name(&input.department_name)?;
    user.ensure_can_manage(&input.department_name)?;
    validate_description(&input.description)?;

    if !DepartmentRepo::exists(&state.pool, &input.department_name).await? {
        return Err(CoreError::Validation(format!(
            "Unknown department '{}'",
            input.department_name
        ))
        .into());
    }

    let overview =
        OverviewRepo::upsert(&state.pool, &input.department_name, &input.description).await?;

    tracing::info!(
        department = %overview.department,
        user_id = user.user_id,
        "Department overview saved",
    );

    Ok(Json(overview))
}
