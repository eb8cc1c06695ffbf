// ============================
// crates/backend-lib/src/handlers/leave.rs
// ============================
//! Leave requests.
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use hrms_common::{
    requests::{ApplyLeaveRequest, LeaveStatusUpdate},
    responses::{LeaveResponse, LeaveWithEmployee},
    Id, LeaveRequest, LeaveStatus,
};

use super::{employee_for_user, employees_by_id};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::storage::{Filter, Patch, Storage};
use crate::validation::{present, ValidationError};
use crate::AppState;

fn not_found() -> AppError {
    AppError::NotFound("Leave request not found".to_string())
}

/// `POST /api/leave/apply` for the caller's own employee record
pub async fn apply_leave<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    caller: CurrentUser,
    ApiJson(body): ApiJson<ApplyLeaveRequest>,
) -> Result<(StatusCode, Json<LeaveResponse>), AppError> {
    let (Some(leave_type), Some(start_date), Some(end_date)) =
        (present(body.leave_type), body.start_date, body.end_date)
    else {
        return Err(ValidationError::MissingFields(
            "Leave type, start date, and end date are required",
        )
        .into());
    };
    if end_date < start_date {
        return Err(AppError::invalid("End date must not be before start date"));
    }

    let employee = employee_for_user(&state.storage, caller.user_id).await?;
    let leave = state
        .storage
        .insert(LeaveRequest {
            id: 0,
            employee_id: employee.id,
            leave_type,
            start_date,
            end_date,
            reason: present(body.reason),
            status: LeaveStatus::Pending,
            requested_date: Utc::now(),
        })
        .await?;
    tracing::info!(leave_id = leave.id, employee_id = employee.id, "leave requested");

    Ok((
        StatusCode::CREATED,
        Json(LeaveResponse {
            message: "Leave request submitted".to_string(),
            leave,
        }),
    ))
}

/// `GET /api/leave/my`, newest first
pub async fn my_leaves<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    caller: CurrentUser,
) -> Result<Json<Vec<LeaveRequest>>, AppError> {
    let employee = employee_for_user(&state.storage, caller.user_id).await?;
    let leaves = state
        .storage
        .list::<LeaveRequest>(Filter::all().eq("employee_id", employee.id).newest_first())
        .await?;
    Ok(Json(leaves))
}

/// `GET /api/leave/pending` joined with the requesting employee
pub async fn pending_leaves<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    _caller: CurrentUser,
) -> Result<Json<Vec<LeaveWithEmployee>>, AppError> {
    let leaves = state
        .storage
        .list::<LeaveRequest>(
            Filter::all()
                .eq("status", LeaveStatus::Pending.as_str())
                .newest_first(),
        )
        .await?;
    let employees = employees_by_id(&state.storage).await?;

    let joined = leaves
        .into_iter()
        .map(|leave| {
            let employee = employees.get(&leave.employee_id);
            LeaveWithEmployee {
                employee_name: employee.map(|e| e.name.clone()),
                employee_email: employee.map(|e| e.email.clone()),
                leave,
            }
        })
        .collect();
    Ok(Json(joined))
}

pub async fn get_leave<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    _caller: CurrentUser,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<LeaveRequest>, AppError> {
    let leave = state
        .storage
        .get::<LeaveRequest>(id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(leave))
}

/// `PUT /api/leave/approve/:id`. Setting the current status again is a no-op success.
pub async fn decide_leave<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    caller: CurrentUser,
    ApiPath(id): ApiPath<Id>,
    ApiJson(body): ApiJson<LeaveStatusUpdate>,
) -> Result<Json<LeaveResponse>, AppError> {
    let status = body
        .status
        .ok_or(ValidationError::MissingFields("Status is required"))?;
    let leave = state
        .storage
        .update::<LeaveRequest>(id, Patch::new().set("status", status.as_str()))
        .await?
        .ok_or_else(not_found)?;
    tracing::info!(leave_id = id, status = status.as_str(), by = caller.user_id, "leave decided");

    Ok(Json(LeaveResponse {
        message: "Leave request updated".to_string(),
        leave,
    }))
}
