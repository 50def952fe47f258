//! Route definitions for the `/notifications` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /                 -> list
/// PATCH  /read-all         -> read_all
/// GET    /unread-count     -> unread_count
/// PATCH  /{id}/read        -> mark_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notification::list))
        .route("/read-all", patch(notification::read_all))
        .route("/unread-count", get(notification::unread_count))
        .route("/{id}/read", patch(notification::mark_read))
}
