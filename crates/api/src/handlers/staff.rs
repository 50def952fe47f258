//! Admin staff management: technician accounts and user listings.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use pureflow_core::error::CoreError;
use pureflow_core::roles::{ROLE_TECHNICIAN, VALID_ROLES};
use pureflow_db::models::user::{CreateUser, UserResponse};
use pureflow_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / query types
// ---------------------------------------------------------------------------

/// Request body for `POST /technicians`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTechnicianRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 7, message = "Phone number is too short"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Query parameters for the user listing.
#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub role: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/technicians
pub async fn list_technicians(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let technicians = UserRepo::list_by_role(&state.pool, ROLE_TECHNICIAN).await?;
    Ok(Json(technicians.into_iter().map(Into::into).collect()))
}

/// POST /api/v1/technicians
///
/// Provision a technician account. The password hash never leaves the
/// database layer and the response carries the public profile only.
pub async fn create_technician(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTechnicianRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    if UserRepo::find_by_email(&state.pool, &input.email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Email already in use".into(),
        )));
    }
    if UserRepo::find_by_phone(&state.pool, &input.phone).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Phone number already in use".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let technician = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            phone: input.phone,
            username: input.username,
            password_hash,
            role: ROLE_TECHNICIAN.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = technician.id, "Technician account created");
    Ok((StatusCode::CREATED, Json(technician.into())))
}

/// GET /api/v1/users?role=...
///
/// List users by role. The role parameter is required and must be one of
/// the known roles.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<Vec<UserResponse>>> {
    if !VALID_ROLES.contains(&query.role.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid role '{}'. Must be one of: {}",
            query.role,
            VALID_ROLES.join(", ")
        ))));
    }

    let users = UserRepo::list_by_role(&state.pool, &query.role).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}
