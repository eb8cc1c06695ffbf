//! Response bodies returned by the API.

use serde::{Deserialize, Serialize};

use crate::records::{
    AttendanceRecord, Candidate, Job, LeaveRequest, PayrollRecord, TrackingLog, User,
};
use crate::Id;

/// Public view of a [`User`]; never carries the password hash
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Id,
    pub name: String,
    pub email: String,
    /// `data:` URL of the stored picture
    pub profile_picture: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            profile_picture: user
                .profile_picture
                .as_ref()
                .map(|b64| format!("data:image/jpeg;base64,{b64}")),
        }
    }
}

/// Signup and login result
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserProfile,
}

/// `GET /api/user`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserResponse {
    pub user: UserProfile,
}

/// Plain acknowledgement
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `GET /api/dashboard/summary`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_employees: usize,
    pub active_employees: usize,
    pub pending_leaves: usize,
}

/// Mutation acknowledgement carrying the stored leave request
#[derive(Serialize, Debug, Clone)]
pub struct LeaveResponse {
    pub message: String,
    pub leave: LeaveRequest,
}

/// Mutation acknowledgement carrying the stored job
#[derive(Serialize, Debug, Clone)]
pub struct JobResponse {
    pub message: String,
    pub job: Job,
}

/// Leave request joined with its employee
#[derive(Serialize, Debug, Clone)]
pub struct LeaveWithEmployee {
    #[serde(flatten)]
    pub leave: LeaveRequest,
    pub employee_name: Option<String>,
    pub employee_email: Option<String>,
}

/// Attendance record joined with its employee
#[derive(Serialize, Debug, Clone)]
pub struct AttendanceWithEmployee {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    pub employee_name: Option<String>,
}

/// Tracking log joined with its employee
#[derive(Serialize, Debug, Clone)]
pub struct TrackingWithEmployee {
    #[serde(flatten)]
    pub log: TrackingLog,
    pub employee_name: Option<String>,
}

/// Candidate joined with the job applied for
#[derive(Serialize, Debug, Clone)]
pub struct CandidateWithJob {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub job_title: Option<String>,
}

/// Payroll record with its derived totals
#[derive(Serialize, Debug, Clone)]
pub struct PayrollView {
    #[serde(flatten)]
    pub record: PayrollRecord,
    pub gross_pay: f64,
    pub net_pay: f64,
}

impl From<PayrollRecord> for PayrollView {
    fn from(record: PayrollRecord) -> Self {
        Self {
            gross_pay: record.gross(),
            net_pay: record.net(),
            record,
        }
    }
}
