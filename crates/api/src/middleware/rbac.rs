//! Role-gate extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does
//! not meet the route's requirement. These gate whole routes by role;
//! per-resource decisions (may this caller see this job?) go through
//! `pureflow_core::permissions::allows` inside the handler, where the
//! caller's relation to the resource is known.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use pureflow_core::error::CoreError;
use pureflow_core::roles::{ROLE_ADMIN, ROLE_TECHNICIAN};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `technician` or `admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireTechnician(pub AuthUser);

impl FromRequestParts<AppState> for RequireTechnician {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN && user.role != ROLE_TECHNICIAN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Technician or Admin role required".into(),
            )));
        }
        Ok(RequireTechnician(user))
    }
}
