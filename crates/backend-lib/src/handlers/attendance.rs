// ============================
// crates/backend-lib/src/handlers/attendance.rs
// ============================
//! Attendance records.
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use hrms_common::{
    requests::{CreateAttendanceRequest, MonthQuery},
    responses::AttendanceWithEmployee,
    AttendanceRecord,
};

use super::{employees_by_id, require_employee, RECENT_LIMIT};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::extract::{ApiJson, ApiQuery};
use crate::storage::{Filter, Storage};
use crate::validation::{present, validate_month, ValidationError};
use crate::AppState;

/// `GET /api/attendance/monthly[?month=YYYY-MM]`: latest records with employee names
pub async fn monthly_attendance<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    _caller: CurrentUser,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<Json<Vec<AttendanceWithEmployee>>, AppError> {
    let mut filter = Filter::all().latest_by("attendance_date").limit(RECENT_LIMIT);
    if let Some(month) = present(query.month) {
        validate_month(&month)?;
        filter = filter.starts_with("attendance_date", month);
    }

    let records = state.storage.list::<AttendanceRecord>(filter).await?;
    let employees = employees_by_id(&state.storage).await?;
    let joined = records
        .into_iter()
        .map(|record| AttendanceWithEmployee {
            employee_name: employees.get(&record.employee_id).map(|e| e.name.clone()),
            record,
        })
        .collect();
    Ok(Json(joined))
}

/// `POST /api/attendance`
pub async fn record_attendance<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    _caller: CurrentUser,
    ApiJson(body): ApiJson<CreateAttendanceRequest>,
) -> Result<(StatusCode, Json<AttendanceRecord>), AppError> {
    let (Some(employee_id), Some(attendance_date)) = (body.employee_id, body.date) else {
        return Err(ValidationError::MissingFields("Employee ID and date are required").into());
    };
    if let (Some(check_in), Some(check_out)) = (body.check_in_time, body.check_out_time) {
        if check_out < check_in {
            return Err(AppError::invalid("Check-out time must not be before check-in time"));
        }
    }
    require_employee(&state.storage, employee_id).await?;

    let record = state
        .storage
        .insert(AttendanceRecord {
            id: 0,
            employee_id,
            attendance_date,
            check_in_time: body.check_in_time,
            check_out_time: body.check_out_time,
            status: present(body.status),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}
