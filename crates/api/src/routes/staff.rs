//! Route definitions for staff management (admin only).

use axum::routing::get;
use axum::Router;

use crate::handlers::staff;
use crate::state::AppState;

/// Staff routes, merged at the API root.
///
/// ```text
/// GET    /technicians   -> list_technicians
/// POST   /technicians   -> create_technician
/// GET    /users         -> list_users (?role=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/technicians",
            get(staff::list_technicians).post(staff::create_technician),
        )
        .route("/users", get(staff::list_users))
}
