//! Route definitions for the `/stripe` resource.
//!
//! The webhook is public; authenticity comes from the signature header.

use axum::routing::post;
use axum::Router;

use crate::handlers::stripe;
use crate::state::AppState;

/// Routes mounted at `/stripe`.
///
/// ```text
/// POST   /create-payment-intent        -> create_payment_intent
/// POST   /get-or-create-subscription   -> get_or_create_subscription
/// POST   /webhook                      -> webhook (public, signed)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-payment-intent", post(stripe::create_payment_intent))
        .route(
            "/get-or-create-subscription",
            post(stripe::get_or_create_subscription),
        )
        .route("/webhook", post(stripe::webhook))
}
