//! Route definitions for platform settings.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Settings routes, merged at the API root.
///
/// ```text
/// GET    /plan-price            -> get_plan_price (public)
/// POST   /settings/plan-price   -> update_plan_price (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plan-price", get(settings::get_plan_price))
        .route("/settings/plan-price", post(settings::update_plan_price))
}
