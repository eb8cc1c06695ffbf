// ============================
// crates/backend-lib/src/router.rs
// ============================
//! Route table.
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    attendance, auth, dashboard, employees, leave, payroll, recruitment, tracking,
};
use crate::middleware::cors_layer;
use crate::storage::Storage;
use crate::AppState;

/// Body limit for signup, which may carry a profile picture
const SIGNUP_BODY_LIMIT: usize = auth::MAX_PICTURE_BYTES + 64 * 1024;

/// Create the HTTP router
pub fn create_router<S: Storage>(state: Arc<AppState<S>>) -> Router {
    let cors = cors_layer(&state.settings.server);

    Router::new()
        .route("/health", get(auth::health))
        // Session
        .route(
            "/api/signup",
            post(auth::signup::<S>).layer(DefaultBodyLimit::max(SIGNUP_BODY_LIMIT)),
        )
        .route("/api/login", post(auth::login::<S>))
        .route("/api/user", get(auth::current_user::<S>))
        .route("/api/logout", post(auth::logout::<S>))
        .route("/api/forgot-password", post(auth::forgot_password::<S>))
        .route("/api/protected", get(auth::protected))
        .route("/api/dashboard/summary", get(dashboard::summary::<S>))
        // Employees
        .route(
            "/api/employees",
            get(employees::list_employees::<S>).post(employees::create_employee::<S>),
        )
        .route("/api/employees/{id}", get(employees::get_employee::<S>))
        .route(
            "/api/employees/{id}/status",
            put(employees::update_employee_status::<S>),
        )
        // Leave
        .route("/api/leave/apply", post(leave::apply_leave::<S>))
        .route("/api/leave/my", get(leave::my_leaves::<S>))
        .route("/api/leave/pending", get(leave::pending_leaves::<S>))
        .route("/api/leave/approve/{id}", put(leave::decide_leave::<S>))
        .route("/api/leave/{id}", get(leave::get_leave::<S>))
        // Attendance, payroll, tracking
        .route("/api/attendance", post(attendance::record_attendance::<S>))
        .route("/api/attendance/monthly", get(attendance::monthly_attendance::<S>))
        .route("/api/payroll", post(payroll::create_payroll::<S>))
        .route("/api/payroll/{month}", get(payroll::my_payroll::<S>))
        .route("/api/tracking", post(tracking::record_tracking::<S>))
        .route("/api/tracking/logs", get(tracking::tracking_logs::<S>))
        // Recruitment
        .route(
            "/api/jobs",
            get(recruitment::list_jobs::<S>).post(recruitment::create_job::<S>),
        )
        .route(
            "/api/jobs/{id}",
            get(recruitment::get_job::<S>)
                .put(recruitment::update_job::<S>)
                .delete(recruitment::delete_job::<S>),
        )
        .route(
            "/api/candidates",
            get(recruitment::list_candidates::<S>).post(recruitment::create_candidate::<S>),
        )
        .route(
            "/api/candidates/{id}",
            get(recruitment::get_candidate::<S>).put(recruitment::update_candidate::<S>),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
