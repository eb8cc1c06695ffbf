// ============================
// crates/backend-lib/src/handlers/employees.rs
// ============================
//! Employee records.
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use hrms_common::{
    requests::{CreateEmployeeRequest, EmployeeStatusUpdate},
    Employee, EmployeeStatus, Id, User,
};

use super::require_employee;
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::storage::{Filter, Patch, Storage};
use crate::validation::{present, validate_amount, validate_email, ValidationError};
use crate::AppState;

pub async fn list_employees<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    _caller: CurrentUser,
) -> Result<Json<Vec<Employee>>, AppError> {
    Ok(Json(state.storage.list::<Employee>(Filter::all()).await?))
}

/// `POST /api/employees`. A linked user may own at most one employee.
pub async fn create_employee<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    _caller: CurrentUser,
    ApiJson(body): ApiJson<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    let (Some(name), Some(email)) = (present(body.name), present(body.email)) else {
        return Err(ValidationError::MissingFields("Name and email are required").into());
    };
    validate_email(&email)?;
    if let Some(salary) = body.salary {
        validate_amount("salary", salary)?;
    }

    if let Some(user_id) = body.user_id {
        if state.storage.get::<User>(user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }
    }

    let employee = state
        .storage
        .insert(Employee {
            id: 0,
            user_id: body.user_id,
            name,
            email,
            phone: present(body.phone),
            department: present(body.department),
            position: present(body.position),
            salary: body.salary,
            hire_date: body.hire_date,
            status: EmployeeStatus::Active,
            created_at: Utc::now(),
        })
        .await
        .map_err(|err| match err {
            // user_id is unique among employees
            AppError::Conflict(_) => {
                AppError::Conflict("User is already linked to an employee".to_string())
            },
            other => other,
        })?;
    tracing::info!(employee_id = employee.id, "employee created");
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn get_employee<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    _caller: CurrentUser,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<Employee>, AppError> {
    Ok(Json(require_employee(&state.storage, id).await?))
}

/// `PUT /api/employees/:id/status`
pub async fn update_employee_status<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    _caller: CurrentUser,
    ApiPath(id): ApiPath<Id>,
    ApiJson(body): ApiJson<EmployeeStatusUpdate>,
) -> Result<Json<Employee>, AppError> {
    let status = body
        .status
        .ok_or(ValidationError::MissingFields("Status is required"))?;
    let employee = state
        .storage
        .update::<Employee>(id, Patch::new().set("status", status.as_str()))
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
    Ok(Json(employee))
}
