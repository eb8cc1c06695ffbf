//! Persisted records.
//!
//! Field names are the on-disk and on-wire names (snake_case). Every
//! record carries its own `id`; it is `0` until a backend assigns one.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Entity, Id};

/// Account role
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Hr,
    #[default]
    Employee,
}

/// Login identity
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: Id,
    pub name: String,
    pub email: String,
    /// PHC-formatted scrypt hash
    pub password_hash: String,
    /// Base64 image bytes
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Entity for User {
    const COLLECTION: &'static str = "users";
    const FIELDS: &'static [&'static str] = &[
        "name",
        "email",
        "password_hash",
        "profile_picture",
        "role",
        "created_at",
    ];
    const UNIQUE: &'static [&'static str] = &["email"];

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// Employment status
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

impl EmployeeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// Employee record, optionally linked to a login
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: Id,
    /// Linked account; `None` for employees without a login
    pub user_id: Option<Id>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub salary: Option<f64>,
    pub hire_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
}

impl Entity for Employee {
    const COLLECTION: &'static str = "employees";
    const FIELDS: &'static [&'static str] = &[
        "user_id",
        "name",
        "email",
        "phone",
        "department",
        "position",
        "salary",
        "hire_date",
        "status",
        "created_at",
    ];
    const UNIQUE: &'static [&'static str] = &["user_id"];

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// Job posting status
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Open,
    Closed,
}

/// Job posting
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Job {
    pub id: Id,
    pub job_title: String,
    pub department: String,
    pub experience: Option<String>,
    /// Free-text salary or range, e.g. "50k-70k"
    pub salary: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub status: JobStatus,
    pub posted_date: DateTime<Utc>,
}

impl Entity for Job {
    const COLLECTION: &'static str = "jobs";
    const FIELDS: &'static [&'static str] = &[
        "job_title",
        "department",
        "experience",
        "salary",
        "description",
        "status",
        "posted_date",
    ];

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// Recruitment pipeline stage
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    New,
    #[default]
    Pending,
    Shortlisted,
    Interviewed,
    Hired,
    Rejected,
}

/// Job applicant
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: Id,
    /// Job applied for; `None` for open applications
    pub job_id: Option<Id>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub resume_url: Option<String>,
    #[serde(default)]
    pub status: CandidateStatus,
    pub applied_date: DateTime<Utc>,
}

impl Entity for Candidate {
    const COLLECTION: &'static str = "candidates";
    const FIELDS: &'static [&'static str] = &[
        "job_id",
        "name",
        "email",
        "phone",
        "resume_url",
        "status",
        "applied_date",
    ];

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// Leave request decision state
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// Leave request filed by an employee
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LeaveRequest {
    pub id: Id,
    pub employee_id: Id,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    #[serde(default)]
    pub status: LeaveStatus,
    pub requested_date: DateTime<Utc>,
}

impl Entity for LeaveRequest {
    const COLLECTION: &'static str = "leave_requests";
    const FIELDS: &'static [&'static str] = &[
        "employee_id",
        "leave_type",
        "start_date",
        "end_date",
        "reason",
        "status",
        "requested_date",
    ];

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// One day of attendance for one employee
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AttendanceRecord {
    pub id: Id,
    pub employee_id: Id,
    pub attendance_date: NaiveDate,
    pub check_in_time: Option<NaiveTime>,
    pub check_out_time: Option<NaiveTime>,
    /// e.g. "present", "absent", "late"
    pub status: Option<String>,
}

impl Entity for AttendanceRecord {
    const COLLECTION: &'static str = "attendance";
    const FIELDS: &'static [&'static str] = &[
        "employee_id",
        "attendance_date",
        "check_in_time",
        "check_out_time",
        "status",
    ];

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// Monthly pay inputs. Gross and net are derived, never stored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PayrollRecord {
    pub id: Id,
    pub employee_id: Id,
    /// `YYYY-MM`
    pub month: String,
    pub basic_salary: f64,
    pub allowances: f64,
    pub deductions: f64,
    pub created_at: DateTime<Utc>,
}

impl PayrollRecord {
    /// basic salary + allowances
    pub fn gross(&self) -> f64 {
        self.basic_salary + self.allowances
    }

    /// gross - deductions
    pub fn net(&self) -> f64 {
        self.gross() - self.deductions
    }
}

impl Entity for PayrollRecord {
    const COLLECTION: &'static str = "payroll";
    const FIELDS: &'static [&'static str] = &[
        "employee_id",
        "month",
        "basic_salary",
        "allowances",
        "deductions",
        "created_at",
    ];
    const UNIQUE_TOGETHER: &'static [&'static [&'static str]] = &[&["employee_id", "month"]];

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// Location/activity log entry
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackingLog {
    pub id: Id,
    pub employee_id: Id,
    pub tracking_date: NaiveDate,
    pub location: String,
    pub activity: Option<String>,
    /// Minutes
    pub duration: Option<i64>,
}

impl Entity for TrackingLog {
    const COLLECTION: &'static str = "tracking";
    const FIELDS: &'static [&'static str] =
        &["employee_id", "tracking_date", "location", "activity", "duration"];

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}
