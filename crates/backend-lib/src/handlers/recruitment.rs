// ============================
// crates/backend-lib/src/handlers/recruitment.rs
// ============================
//! Job postings and candidates. Reads are public, writes need a session.
use std::collections::HashMap;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use hrms_common::{
    requests::{CandidateStatusUpdate, CreateCandidateRequest, CreateJobRequest, UpdateJobRequest},
    responses::{CandidateWithJob, JobResponse, MessageResponse},
    Candidate, CandidateStatus, Id, Job, JobStatus,
};
use serde_json::Value;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::storage::{Filter, Patch, Removal, Storage};
use crate::validation::{present, validate_email, ValidationError};
use crate::AppState;

fn job_not_found() -> AppError {
    AppError::NotFound("Job not found".to_string())
}

fn candidate_not_found() -> AppError {
    AppError::NotFound("Candidate not found".to_string())
}

/// `GET /api/jobs`, newest first
pub async fn list_jobs<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(state.storage.list::<Job>(Filter::all().newest_first()).await?))
}

/// `POST /api/jobs`
pub async fn create_job<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    _caller: CurrentUser,
    ApiJson(body): ApiJson<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobResponse>), AppError> {
    let (Some(job_title), Some(department)) = (present(body.job_title), present(body.department))
    else {
        return Err(ValidationError::MissingFields("Job title and department are required").into());
    };

    let job = state
        .storage
        .insert(Job {
            id: 0,
            job_title,
            department,
            experience: present(body.experience),
            salary: present(body.salary),
            description: present(body.description),
            status: JobStatus::Open,
            posted_date: Utc::now(),
        })
        .await?;
    tracing::info!(job_id = job.id, "job posted");

    Ok((
        StatusCode::CREATED,
        Json(JobResponse {
            message: "Job posted successfully".to_string(),
            job,
        }),
    ))
}

pub async fn get_job<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<Job>, AppError> {
    Ok(Json(state.storage.get::<Job>(id).await?.ok_or_else(job_not_found)?))
}

/// Reject a provided-but-blank required field
fn non_blank(name: &str, value: Option<String>) -> Result<Option<String>, AppError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(AppError::invalid(format!("{name} must not be empty"))),
        Some(v) => Ok(Some(v.trim().to_string())),
        None => Ok(None),
    }
}

/// Optional text as `create_job` stores it: trimmed, blank clears it
fn optional_text(value: Option<String>) -> Option<Value> {
    value.map(|v| present(Some(v)).map_or(Value::Null, Value::from))
}

/// `PUT /api/jobs/:id`; fields left out of the body keep their value
pub async fn update_job<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    _caller: CurrentUser,
    ApiPath(id): ApiPath<Id>,
    ApiJson(body): ApiJson<UpdateJobRequest>,
) -> Result<Json<Job>, AppError> {
    let mut patch = Patch::new()
        .set_opt("job_title", non_blank("jobTitle", body.job_title)?)
        .set_opt("department", non_blank("department", body.department)?)
        .set_opt("experience", optional_text(body.experience))
        .set_opt("salary", optional_text(body.salary))
        .set_opt("description", optional_text(body.description));
    if let Some(status) = body.status {
        patch = patch.set_serialized("status", &status)?;
    }
    if patch.is_empty() {
        return Err(AppError::invalid("No fields to update"));
    }

    let job = state
        .storage
        .update::<Job>(id, patch)
        .await?
        .ok_or_else(job_not_found)?;
    Ok(Json(job))
}

/// `DELETE /api/jobs/:id`; refused while candidates reference the job
pub async fn delete_job<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    _caller: CurrentUser,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<MessageResponse>, AppError> {
    match state
        .storage
        .delete_unreferenced::<Job, Candidate>(id, "job_id")
        .await?
    {
        Removal::Deleted => {},
        Removal::Missing => return Err(job_not_found()),
        Removal::Referenced(applicants) => {
            return Err(AppError::Conflict(format!(
                "Job has {applicants} candidate(s) and cannot be deleted"
            )));
        },
    }
    tracing::info!(job_id = id, "job deleted");
    Ok(Json(MessageResponse::new("Job deleted successfully")))
}

/// `GET /api/candidates` joined with the job title, newest first
pub async fn list_candidates<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<CandidateWithJob>>, AppError> {
    let candidates = state
        .storage
        .list::<Candidate>(Filter::all().newest_first())
        .await?;
    let titles: HashMap<Id, String> = state
        .storage
        .list::<Job>(Filter::all())
        .await?
        .into_iter()
        .map(|job| (job.id, job.job_title))
        .collect();

    let joined = candidates
        .into_iter()
        .map(|candidate| CandidateWithJob {
            job_title: candidate.job_id.and_then(|id| titles.get(&id).cloned()),
            candidate,
        })
        .collect();
    Ok(Json(joined))
}

/// `POST /api/candidates`
pub async fn create_candidate<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    _caller: CurrentUser,
    ApiJson(body): ApiJson<CreateCandidateRequest>,
) -> Result<(StatusCode, Json<Candidate>), AppError> {
    let (Some(name), Some(email)) = (present(body.name), present(body.email)) else {
        return Err(ValidationError::MissingFields("Name and email are required").into());
    };
    validate_email(&email)?;

    let candidate = Candidate {
        id: 0,
        job_id: body.job_id,
        name,
        email,
        phone: present(body.phone),
        resume_url: present(body.resume_url),
        status: CandidateStatus::default(),
        applied_date: Utc::now(),
    };
    // The job must still exist when the candidate is written
    let candidate = match body.job_id {
        Some(job_id) => state
            .storage
            .insert_linked::<Job, _>(job_id, candidate)
            .await?
            .ok_or_else(job_not_found)?,
        None => state.storage.insert(candidate).await?,
    };
    Ok((StatusCode::CREATED, Json(candidate)))
}

pub async fn get_candidate<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<Candidate>, AppError> {
    Ok(Json(
        state
            .storage
            .get::<Candidate>(id)
            .await?
            .ok_or_else(candidate_not_found)?,
    ))
}

/// `PUT /api/candidates/:id`: move the candidate through the pipeline
pub async fn update_candidate<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    _caller: CurrentUser,
    ApiPath(id): ApiPath<Id>,
    ApiJson(body): ApiJson<CandidateStatusUpdate>,
) -> Result<Json<Candidate>, AppError> {
    let status = body
        .status
        .ok_or(ValidationError::MissingFields("Status is required"))?;
    let candidate = state
        .storage
        .update::<Candidate>(id, Patch::new().set_serialized("status", &status)?)
        .await?
        .ok_or_else(candidate_not_found)?;
    Ok(Json(candidate))
}
