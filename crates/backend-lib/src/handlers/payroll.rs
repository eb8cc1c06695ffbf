// ============================
// crates/backend-lib/src/handlers/payroll.rs
// ============================
//! Payroll. Gross and net pay are computed on every read.
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use hrms_common::{
    requests::CreatePayrollRequest, responses::PayrollView, PayrollRecord,
};
use serde_json::{json, Value};

use super::{employee_for_user, require_employee};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::storage::{Filter, Storage};
use crate::validation::{present, validate_amount, validate_month, ValidationError};
use crate::AppState;

/// `GET /api/payroll/:month`: the caller's payroll for the month, or `{}`
pub async fn my_payroll<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    caller: CurrentUser,
    ApiPath(month): ApiPath<String>,
) -> Result<Json<Value>, AppError> {
    validate_month(&month)?;
    let employee = employee_for_user(&state.storage, caller.user_id).await?;

    let record = state
        .storage
        .list::<PayrollRecord>(
            Filter::all()
                .eq("employee_id", employee.id)
                .eq("month", month.as_str())
                .limit(1),
        )
        .await?
        .into_iter()
        .next();

    match record {
        Some(record) => Ok(Json(serde_json::to_value(PayrollView::from(record))?)),
        None => Ok(Json(json!({}))),
    }
}

/// `POST /api/payroll`; one record per employee and month
pub async fn create_payroll<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    _caller: CurrentUser,
    ApiJson(body): ApiJson<CreatePayrollRequest>,
) -> Result<(StatusCode, Json<PayrollView>), AppError> {
    let (Some(employee_id), Some(month), Some(basic_salary)) =
        (body.employee_id, present(body.month), body.basic_salary)
    else {
        return Err(ValidationError::MissingFields(
            "Employee ID, month, and basic salary are required",
        )
        .into());
    };
    validate_month(&month)?;
    let basic_salary = validate_amount("basicSalary", basic_salary)?;
    let allowances = validate_amount("allowances", body.allowances.unwrap_or(0.0))?;
    let deductions = validate_amount("deductions", body.deductions.unwrap_or(0.0))?;

    require_employee(&state.storage, employee_id).await?;

    // The store enforces one record per (employee_id, month)
    let record = state
        .storage
        .insert(PayrollRecord {
            id: 0,
            employee_id,
            month: month.clone(),
            basic_salary,
            allowances,
            deductions,
            created_at: Utc::now(),
        })
        .await
        .map_err(|err| match err {
            AppError::Conflict(_) => AppError::Conflict(format!("Payroll for {month} already recorded")),
            other => other,
        })?;
    Ok((StatusCode::CREATED, Json(PayrollView::from(record))))
}
