// ============================
// crates/backend-lib/src/handlers/tracking.rs
// ============================
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use hrms_common::{
    requests::CreateTrackingRequest, responses::TrackingWithEmployee, TrackingLog,
};

use super::{employees_by_id, require_employee, RECENT_LIMIT};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::storage::{Filter, Storage};
use crate::validation::{present, ValidationError};
use crate::AppState;

/// `GET /api/tracking/logs`: latest entries with employee names
pub async fn tracking_logs<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    _caller: CurrentUser,
) -> Result<Json<Vec<TrackingWithEmployee>>, AppError> {
    let logs = state
        .storage
        .list::<TrackingLog>(Filter::all().latest_by("tracking_date").limit(RECENT_LIMIT))
        .await?;
    let employees = employees_by_id(&state.storage).await?;
    let joined = logs
        .into_iter()
        .map(|log| TrackingWithEmployee {
            employee_name: employees.get(&log.employee_id).map(|e| e.name.clone()),
            log,
        })
        .collect();
    Ok(Json(joined))
}

/// `POST /api/tracking`
pub async fn record_tracking<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    _caller: CurrentUser,
    ApiJson(body): ApiJson<CreateTrackingRequest>,
) -> Result<(StatusCode, Json<TrackingLog>), AppError> {
    let (Some(employee_id), Some(tracking_date), Some(location)) =
        (body.employee_id, body.date, present(body.location))
    else {
        return Err(ValidationError::MissingFields(
            "Employee ID, date, and location are required",
        )
        .into());
    };
    if body.duration.is_some_and(|minutes| minutes < 0) {
        return Err(AppError::invalid("Duration must not be negative"));
    }
    require_employee(&state.storage, employee_id).await?;

    let log = state
        .storage
        .insert(TrackingLog {
            id: 0,
            employee_id,
            tracking_date,
            location,
            activity: present(body.activity),
            duration: body.duration,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(log)))
}
