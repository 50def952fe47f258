//! Route definitions for the `/subscriptions` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::subscription;
use crate::state::AppState;

/// Routes mounted at `/subscriptions`.
///
/// ```text
/// GET    /me               -> get_me (get-or-create)
/// PATCH  /me               -> patch_me
/// POST   /                 -> create
/// GET    /                 -> list (admin)
/// POST   /change-plan      -> change_plan
/// POST   /update-payment   -> update_payment_method
/// PATCH  /{id}             -> admin_patch (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/me",
            get(subscription::get_me).patch(subscription::patch_me),
        )
        .route(
            "/",
            post(subscription::create).get(subscription::list),
        )
        .route("/change-plan", post(subscription::change_plan))
        .route("/update-payment", post(subscription::update_payment_method))
        .route("/{id}", patch(subscription::admin_patch))
}
