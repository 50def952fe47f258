//! Route definitions for the `/onboarding` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::onboarding;
use crate::state::AppState;

/// Routes mounted at `/onboarding`.
///
/// ```text
/// GET    /                        -> get_state
/// POST   /                        -> update_state
/// POST   /address                 -> save_address
/// POST   /schedule-installation   -> schedule_installation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(onboarding::get_state).post(onboarding::update_state),
        )
        .route("/address", post(onboarding::save_address))
        .route(
            "/schedule-installation",
            post(onboarding::schedule_installation),
        )
}
