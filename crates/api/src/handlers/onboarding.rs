//! Handlers for the `/onboarding` resource.
//!
//! Onboarding is forward-only: the step may advance or stay put but never
//! regress. The milestone-specific endpoints (address, installation) only
//! advance the step when that would still be a forward move, so a customer
//! revisiting an earlier screen cannot be pushed backwards.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use pureflow_core::error::CoreError;
use pureflow_core::job::JobType;
use pureflow_core::onboarding::OnboardingStep;
use pureflow_db::models::job::CreateJob;
use pureflow_db::models::onboarding::{OnboardingPatch, OnboardingState};
use pureflow_db::models::user::SaveAddress;
use pureflow_db::repositories::{JobRepo, OnboardingRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::notify;
use crate::state::AppState;

/// Installation visits are booked in two-hour windows.
const INSTALLATION_WINDOW_HOURS: i64 = 2;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /onboarding/schedule-installation`.
#[derive(Debug, Deserialize)]
pub struct ScheduleInstallationRequest {
    /// Visit date, `YYYY-MM-DD`.
    pub date: String,
    /// Visit start time, `HH:MM` (24h).
    pub time: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/onboarding
///
/// Return the customer's onboarding state. A customer who has never touched
/// onboarding gets a synthetic initial state rather than a 404, so clients
/// can always route on `step`.
pub async fn get_state(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    match OnboardingRepo::find_by_user(&state.pool, auth.user_id).await? {
        Some(row) => Ok(Json(serde_json::json!(row))),
        None => Ok(Json(serde_json::json!({
            "step": OnboardingStep::Account.as_str(),
            "plan_selected": false,
            "terms_accepted": false,
            "address_entered": false,
            "installation_scheduled": false,
            "payment_completed": false,
        }))),
    }
}

/// POST /api/v1/onboarding
///
/// Merge a patch into the onboarding row. Step changes must be forward
/// moves; identical-step writes are accepted as no-ops for idempotent
/// clients.
pub async fn update_state(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(patch): Json<OnboardingPatch>,
) -> AppResult<Json<OnboardingState>> {
    if let Some(step) = &patch.step {
        let target: OnboardingStep = step.parse().map_err(AppError::Core)?;
        let current = current_step(&state, auth.user_id).await?;
        if !current.can_advance_to(target) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Cannot move onboarding back from '{current}' to '{target}'"
            ))));
        }
    }

    let row = OnboardingRepo::upsert(&state.pool, auth.user_id, &patch).await?;
    Ok(Json(row))
}

/// POST /api/v1/onboarding/address
///
/// Save the service address onto the user and flag the milestone.
pub async fn save_address(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SaveAddress>,
) -> AppResult<Json<serde_json::Value>> {
    if input.address.trim().is_empty() || input.city.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Address and city are required".into(),
        )));
    }

    let user = UserRepo::set_address(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    let patch = OnboardingPatch {
        step: forward_step(&state, auth.user_id, OnboardingStep::Address).await?,
        address_entered: Some(true),
        ..Default::default()
    };
    OnboardingRepo::upsert(&state.pool, auth.user_id, &patch).await?;

    let user: pureflow_db::models::user::UserResponse = user.into();
    Ok(Json(serde_json::json!({ "success": true, "user": user })))
}

/// POST /api/v1/onboarding/schedule-installation
///
/// Book the installation visit: a two-hour `installation` job at the
/// customer's stored address, unassigned until an admin picks a technician.
pub async fn schedule_installation(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ScheduleInstallationRequest>,
) -> AppResult<(StatusCode, Json<pureflow_db::models::job::Job>)> {
    let date = NaiveDate::parse_from_str(&input.date, "%Y-%m-%d").map_err(|_| {
        AppError::Core(CoreError::Validation(
            "Invalid date. Expected YYYY-MM-DD".into(),
        ))
    })?;
    let time = NaiveTime::parse_from_str(&input.time, "%H:%M").map_err(|_| {
        AppError::Core(CoreError::Validation(
            "Invalid time. Expected HH:MM".into(),
        ))
    })?;

    let scheduled_for = Utc.from_utc_datetime(&date.and_time(time));
    let scheduled_end_time = scheduled_for + Duration::hours(INSTALLATION_WINDOW_HOURS);

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    let address = user.address.filter(|a| !a.is_empty()).ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "Save your address before scheduling installation".into(),
        ))
    })?;

    let job = JobRepo::create(
        &state.pool,
        &CreateJob {
            user_id: auth.user_id,
            technician_id: None,
            job_type: JobType::Installation.as_str().to_string(),
            scheduled_for,
            scheduled_end_time,
            notes: Some("New installation".to_string()),
            address,
            address_lat: user.address_lat,
            address_lng: user.address_lng,
        },
    )
    .await?;

    let patch = OnboardingPatch {
        step: forward_step(&state, auth.user_id, OnboardingStep::Payment).await?,
        installation_scheduled: Some(true),
        ..Default::default()
    };
    OnboardingRepo::upsert(&state.pool, auth.user_id, &patch).await?;

    notify::notify_user(
        &state.pool,
        auth.user_id,
        "Installation Scheduled",
        &format!(
            "Your installation visit is booked for {}.",
            scheduled_for.format("%Y-%m-%d %H:%M")
        ),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(job)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The customer's current step, `Account` when no row exists yet.
async fn current_step(
    state: &AppState,
    user_id: pureflow_core::types::DbId,
) -> Result<OnboardingStep, AppError> {
    let current = match OnboardingRepo::find_by_user(&state.pool, user_id).await? {
        Some(row) => row.step.parse().map_err(AppError::Core)?,
        None => OnboardingStep::Account,
    };
    Ok(current)
}

/// `Some(target)` when moving to `target` is a forward move, else `None`
/// so the milestone write leaves the step untouched.
async fn forward_step(
    state: &AppState,
    user_id: pureflow_core::types::DbId,
    target: OnboardingStep,
) -> Result<Option<String>, AppError> {
    let current = current_step(state, user_id).await?;
    Ok(current
        .can_advance_to(target)
        .then(|| target.as_str().to_string()))
}
