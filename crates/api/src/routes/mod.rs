pub mod auth;
pub mod health;
pub mod job;
pub mod notification;
pub mod onboarding;
pub mod payment;
pub mod settings;
pub mod staff;
pub mod stripe;
pub mod subscription;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                      register (public)
/// /auth/login                         login (public)
/// /auth/me                            current user (auth required)
///
/// /onboarding                         get state, merge patch
/// /onboarding/address                 save service address (POST)
/// /onboarding/schedule-installation   book installation visit (POST)
///
/// /subscriptions/me                   get-or-create own, merge patch
/// /subscriptions                      create own (POST), admin list (GET)
/// /subscriptions/change-plan          switch plan (POST)
/// /subscriptions/update-payment       update card on file (POST)
/// /subscriptions/{id}                 admin merge patch (PATCH)
///
/// /payments                           direct payment (POST), admin list (GET)
/// /payments/me                        own payment history (GET)
///
/// /stripe/create-payment-intent       one-off intent (POST)
/// /stripe/get-or-create-subscription  recurring setup (POST)
/// /stripe/webhook                     gateway event sink (public, signed)
///
/// /jobs                               admin list (GET), admin create (POST)
/// /jobs/me                            own jobs (GET)
/// /jobs/technician                    technician's jobs (GET)
/// /jobs/{id}                          get (relation-gated)
/// /jobs/{id}/status                   progress status (PATCH)
/// /jobs/{id}/assign                   assign technician (PATCH)
///
/// /notifications                      list (?unread_only, limit, offset)
/// /notifications/read-all             mark all read (PATCH)
/// /notifications/unread-count         unread count (GET)
/// /notifications/{id}/read            mark read (PATCH)
///
/// /technicians                        admin list, create
/// /users                              admin list by role (?role=)
///
/// /plan-price                         current plan price (public)
/// /settings/plan-price                admin update plan price (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/onboarding", onboarding::router())
        .nest("/subscriptions", subscription::router())
        .nest("/payments", payment::router())
        .nest("/stripe", stripe::router())
        .nest("/jobs", job::router())
        .nest("/notifications", notification::router())
        .merge(staff::router())
        .merge(settings::router())
}
