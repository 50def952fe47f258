//! Route definitions for the `/payments` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::payment;
use crate::state::AppState;

/// Routes mounted at `/payments`.
///
/// ```text
/// POST   /     -> create_direct
/// GET    /     -> list (admin)
/// GET    /me   -> list_me
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(payment::create_direct).get(payment::list))
        .route("/me", get(payment::list_me))
}
