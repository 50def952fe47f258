//! Route definitions for the `/jobs` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::job;
use crate::state::AppState;

/// Routes mounted at `/jobs`.
///
/// ```text
/// GET    /               -> list (admin)
/// POST   /               -> create (admin)
/// GET    /me             -> list_me
/// GET    /technician     -> list_assigned (technician)
/// GET    /{id}           -> get (relation-gated)
/// PATCH  /{id}/status    -> update_status
/// PATCH  /{id}/assign    -> assign (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(job::list).post(job::create))
        .route("/me", get(job::list_me))
        .route("/technician", get(job::list_assigned))
        .route("/{id}", get(job::get))
        .route("/{id}/status", patch(job::update_status))
        .route("/{id}/assign", patch(job::assign))
}
