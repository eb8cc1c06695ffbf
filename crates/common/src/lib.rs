// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! shared between the HRMS dashboard API and its storage backends.
//! This crate defines the persisted records, the request payloads
//! accepted by the API and the response shapes it returns.

use serde::{de::DeserializeOwned, Serialize};

pub mod records;
pub mod requests;
pub mod responses;

pub use records::{
    AttendanceRecord, Candidate, CandidateStatus, Employee, EmployeeStatus, Job, JobStatus,
    LeaveRequest, LeaveStatus, PayrollRecord, Role, TrackingLog, User,
};

/// Identifier type for every persisted record
pub type Id = i64;

/// A record type that a storage backend can persist.
///
/// `FIELDS` lists every serialized field except `id`, in column order.
/// Backends only ever use these names as SQL identifiers or document
/// keys, so caller-supplied field names must be checked against it.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection (file stem or table) name
    const COLLECTION: &'static str;
    /// Persisted fields, `id` excluded
    const FIELDS: &'static [&'static str];
    /// Fields whose values must be unique across the collection; `null`
    /// never collides
    const UNIQUE: &'static [&'static str] = &[];
    /// Field groups whose combined values must be unique
    const UNIQUE_TOGETHER: &'static [&'static [&'static str]] = &[];

    /// Record identifier (0 before insertion)
    fn id(&self) -> Id;

    /// Set the identifier assigned by the backend
    fn set_id(&mut self, id: Id);

    /// Whether `field` may be used in a filter or a patch
    fn has_field(field: &str) -> bool {
        field == "id" || Self::FIELDS.contains(&field)
    }
}

/// Every collection a backend has to provision
pub const COLLECTIONS: &[&str] = &[
    User::COLLECTION,
    Employee::COLLECTION,
    Job::COLLECTION,
    Candidate::COLLECTION,
    LeaveRequest::COLLECTION,
    AttendanceRecord::COLLECTION,
    PayrollRecord::COLLECTION,
    TrackingLog::COLLECTION,
];
