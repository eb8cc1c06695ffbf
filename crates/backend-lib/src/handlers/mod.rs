// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers, one module per area of the dashboard.
use std::collections::HashMap;

use hrms_common::{Employee, Id};

use crate::error::AppError;
use crate::storage::{Filter, Storage};

pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod employees;
pub mod leave;
pub mod payroll;
pub mod recruitment;
pub mod tracking;

/// Rows returned by the "latest" listings
pub const RECENT_LIMIT: usize = 100;

/// Employee record linked to a login
pub(crate) async fn employee_for_user<S: Storage>(storage: &S, user_id: Id) -> Result<Employee, AppError> {
    storage
        .list::<Employee>(Filter::all().eq("user_id", user_id).limit(1))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))
}

/// Employee by id, or 404
pub(crate) async fn require_employee<S: Storage>(storage: &S, id: Id) -> Result<Employee, AppError> {
    storage
        .get::<Employee>(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))
}

/// Every employee keyed by id, for joined listings
pub(crate) async fn employees_by_id<S: Storage>(storage: &S) -> Result<HashMap<Id, Employee>, AppError> {
    Ok(storage
        .list::<Employee>(Filter::all())
        .await?
        .into_iter()
        .map(|e| (e.id, e))
        .collect())
}
