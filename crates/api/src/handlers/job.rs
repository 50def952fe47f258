//! Handlers for the `/jobs` resource.
//!
//! Read access is relation-based: customers see jobs on their account,
//! technicians see jobs assigned to them, admins see everything. Writes go
//! through the job status machine and the capability matrix.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pureflow_core::error::CoreError;
use pureflow_core::job::{JobStatus, JobType};
use pureflow_core::permissions::{allows, Action, Relation};
use pureflow_core::roles::ROLE_TECHNICIAN;
use pureflow_core::types::DbId;
use pureflow_db::models::job::{CreateJob, Job, JobFilters};
use pureflow_db::models::user::UserResponse;
use pureflow_db::repositories::{JobRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireTechnician};
use crate::notify;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PATCH /jobs/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateJobStatusRequest {
    pub status: String,
    #[serde(default)]
    pub photo_proof: Option<String>,
}

/// Request body for `PATCH /jobs/{id}/assign`.
#[derive(Debug, Deserialize)]
pub struct AssignTechnicianRequest {
    pub technician_id: DbId,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/jobs/me
///
/// The customer's own jobs, soonest visit first.
pub async fn list_me(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<Job>>> {
    let jobs = JobRepo::list_for_customer(&state.pool, auth.user_id).await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/technician
///
/// The technician's assigned jobs, each enriched with the customer so the
/// field app can show who and where without extra round trips.
pub async fn list_assigned(
    RequireTechnician(auth): RequireTechnician,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let jobs = JobRepo::list_for_technician(&state.pool, auth.user_id).await?;
    let rows = enrich_with_customer(&state, jobs).await?;
    Ok(Json(serde_json::json!({ "data": rows })))
}

/// GET /api/v1/jobs
///
/// Admin dashboard listing with status / date / technician / type filters.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(filters): Query<JobFilters>,
) -> AppResult<Json<serde_json::Value>> {
    if let Some(status) = &filters.status {
        status.parse::<JobStatus>().map_err(AppError::Core)?;
    }
    if let Some(job_type) = &filters.job_type {
        job_type.parse::<JobType>().map_err(AppError::Core)?;
    }

    let jobs = JobRepo::list_all(&state.pool, &filters).await?;
    let rows = enrich_with_customer(&state, jobs).await?;
    Ok(Json(serde_json::json!({ "data": rows })))
}

/// GET /api/v1/jobs/{id}
pub async fn get(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Job>> {
    let job = JobRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Job", id }))?;

    if !allows(&auth.role, relation_to(&auth, &job), Action::ReadJob) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this job".into(),
        )));
    }

    Ok(Json(job))
}

/// POST /api/v1/jobs
///
/// Admin schedules a service visit. The customer is always notified; the
/// technician too when one is assigned up front.
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateJob>,
) -> AppResult<(StatusCode, Json<Job>)> {
    let job_type: JobType = input.job_type.parse().map_err(AppError::Core)?;

    if let Some(technician_id) = input.technician_id {
        require_technician_user(&state, technician_id).await?;
    }

    let job = JobRepo::create(&state.pool, &input).await?;

    notify::notify_user(
        &state.pool,
        job.user_id,
        "New Maintenance Job Scheduled",
        &format!("A new {job_type} job has been scheduled for you."),
    )
    .await?;

    if let Some(technician_id) = job.technician_id {
        notify::notify_user(
            &state.pool,
            technician_id,
            "New Job Assigned",
            &format!("You have been assigned a new {job_type} job."),
        )
        .await?;
    }

    tracing::info!(job_id = job.id, user_id = job.user_id, "Job scheduled");
    Ok((StatusCode::CREATED, Json(job)))
}

/// PATCH /api/v1/jobs/{id}/status
///
/// Progress a job through the status machine. The assigned technician (or
/// an admin) drives this; the customer is told about every move.
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateJobStatusRequest>,
) -> AppResult<Json<Job>> {
    let job = JobRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Job", id }))?;

    if !allows(&auth.role, relation_to(&auth, &job), Action::UpdateJobStatus) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this job".into(),
        )));
    }

    let current: JobStatus = job.status.parse().map_err(AppError::Core)?;
    let target: JobStatus = input.status.parse().map_err(AppError::Core)?;
    if !current.can_transition_to(target) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Cannot change job status from '{current}' to '{target}'"
        ))));
    }

    let job = JobRepo::update_status(
        &state.pool,
        id,
        target.as_str(),
        input.photo_proof.as_deref(),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound { entity: "Job", id }))?;

    notify::notify_user(
        &state.pool,
        job.user_id,
        &format!("Job status updated to {target}"),
        &format!("Your maintenance job has been updated to status: {target}."),
    )
    .await?;

    Ok(Json(job))
}

/// PATCH /api/v1/jobs/{id}/assign
///
/// Admin assigns (or reassigns) a technician to a job.
pub async fn assign(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignTechnicianRequest>,
) -> AppResult<Json<Job>> {
    require_technician_user(&state, input.technician_id).await?;

    let job = JobRepo::assign_technician(&state.pool, id, input.technician_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Job", id }))?;

    notify::notify_user(
        &state.pool,
        input.technician_id,
        "New Job Assigned",
        &format!("You have been assigned a new {} job.", job.job_type),
    )
    .await?;

    Ok(Json(job))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The caller's relation to a job, for the capability matrix.
fn relation_to(auth: &AuthUser, job: &Job) -> Relation {
    if job.user_id == auth.user_id {
        Relation::Owner
    } else if job.technician_id == Some(auth.user_id) {
        Relation::AssignedTechnician
    } else {
        Relation::None
    }
}

/// Reject an assignment target that is not a technician.
async fn require_technician_user(state: &AppState, technician_id: DbId) -> Result<(), AppError> {
    let technician = UserRepo::find_by_id(&state.pool, technician_id).await?;
    match technician {
        Some(user) if user.role == ROLE_TECHNICIAN => Ok(()),
        _ => Err(AppError::Core(CoreError::Validation(
            "Invalid technician".into(),
        ))),
    }
}

/// Attach the customer to each job row for listing responses.
async fn enrich_with_customer(
    state: &AppState,
    jobs: Vec<Job>,
) -> Result<Vec<serde_json::Value>, AppError> {
    let mut rows = Vec::with_capacity(jobs.len());
    for job in jobs {
        let customer = UserRepo::find_by_id(&state.pool, job.user_id)
            .await?
            .map(UserResponse::from);
        let mut row = serde_json::json!(job);
        row["customer"] = serde_json::json!(customer);
        rows.push(row);
    }
    Ok(rows)
}
