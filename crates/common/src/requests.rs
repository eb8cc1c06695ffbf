//! Request payloads accepted by the API.
//!
//! Bodies are camelCase, as the dashboard client sends them. Required
//! fields are still `Option` so a missing field is reported as a 400
//! with a readable message instead of a deserialization failure.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::records::{CandidateStatus, EmployeeStatus, JobStatus, LeaveStatus};
use crate::Id;

/// `POST /api/signup` (JSON form; multipart carries the same fields)
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// `POST /api/login`
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// `POST /api/forgot-password`
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

/// `POST /api/employees`
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    pub user_id: Option<Id>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub salary: Option<f64>,
    pub hire_date: Option<NaiveDate>,
}

/// `PUT /api/employees/:id/status`
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeStatusUpdate {
    pub status: Option<EmployeeStatus>,
}

/// `POST /api/leave/apply`
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApplyLeaveRequest {
    pub leave_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub reason: Option<String>,
}

/// `PUT /api/leave/approve/:id`
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct LeaveStatusUpdate {
    pub status: Option<LeaveStatus>,
}

/// `POST /api/attendance`
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttendanceRequest {
    pub employee_id: Option<Id>,
    pub date: Option<NaiveDate>,
    pub check_in_time: Option<NaiveTime>,
    pub check_out_time: Option<NaiveTime>,
    pub status: Option<String>,
}

/// `GET /api/attendance/monthly?month=YYYY-MM`
#[derive(Deserialize, Debug, Clone, Default)]
pub struct MonthQuery {
    pub month: Option<String>,
}

/// `POST /api/payroll`
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayrollRequest {
    pub employee_id: Option<Id>,
    pub month: Option<String>,
    pub basic_salary: Option<f64>,
    pub allowances: Option<f64>,
    pub deductions: Option<f64>,
}

/// `POST /api/jobs`
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub experience: Option<String>,
    pub salary: Option<String>,
    pub description: Option<String>,
}

/// `PUT /api/jobs/:id`; absent fields are left untouched
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub experience: Option<String>,
    pub salary: Option<String>,
    pub description: Option<String>,
    pub status: Option<JobStatus>,
}

/// `POST /api/candidates`
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateCandidateRequest {
    pub job_id: Option<Id>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub resume_url: Option<String>,
}

/// `PUT /api/candidates/:id`
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CandidateStatusUpdate {
    pub status: Option<CandidateStatus>,
}

/// `POST /api/tracking`
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrackingRequest {
    pub employee_id: Option<Id>,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub activity: Option<String>,
    pub duration: Option<i64>,
}
