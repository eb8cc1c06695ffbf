// ============================
// crates/backend-lib/src/handlers/dashboard.rs
// ============================
use std::sync::Arc;

use axum::{extract::State, Json};
use hrms_common::{responses::DashboardSummary, Employee, EmployeeStatus, LeaveRequest, LeaveStatus};

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::storage::{Filter, Storage};
use crate::AppState;

/// `GET /api/dashboard/summary`
pub async fn summary<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    _caller: CurrentUser,
) -> Result<Json<DashboardSummary>, AppError> {
    let storage = &state.storage;
    let total_employees = storage.count::<Employee>(Filter::all()).await?;
    let active_employees = storage
        .count::<Employee>(Filter::all().eq("status", EmployeeStatus::Active.as_str()))
        .await?;
    let pending_leaves = storage
        .count::<LeaveRequest>(Filter::all().eq("status", LeaveStatus::Pending.as_str()))
        .await?;

    Ok(Json(DashboardSummary {
        total_employees,
        active_employees,
        pending_leaves,
    }))
}
