//! End-to-end onboarding flow: register, save address, schedule the
//! installation visit, pay, and land on a fully active account.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, post_json_auth};
use sqlx::PgPool;

/// Register a customer through the API, returning (token, user_id).
async fn register(pool: &PgPool, email: &str, phone: &str) -> (String, i64) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({
            "email": email,
            "phone": phone,
            "password": "correct-horse-battery",
            "confirm_password": "correct-horse-battery",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    (
        json["access_token"].as_str().unwrap().to_string(),
        json["user"]["id"].as_i64().unwrap(),
    )
}

/// The whole happy path in one sitting.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_full_onboarding_flow(pool: PgPool) {
    let (token, _user_id) = register(&pool, "flow@example.com", "0791000001").await;

    // Fresh account starts at the plan step.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/onboarding", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["step"], "plan");

    // Save the service address.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/onboarding/address",
        &token,
        serde_json::json!({
            "address": "12 Rainbow Street",
            "city": "Amman",
            "lat": 31.9515,
            "lng": 35.9239,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["user"]["address"], "12 Rainbow Street");

    // Book the installation visit: a two-hour scheduled job.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/onboarding/schedule-installation",
        &token,
        serde_json::json!({ "date": "2026-09-01", "time": "10:00" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let job = body_json(response).await;
    assert_eq!(job["job_type"], "installation");
    assert_eq!(job["status"], "scheduled");
    assert_eq!(job["address"], "12 Rainbow Street");
    assert!(job["technician_id"].is_null());

    // Pay directly (cash on delivery). Settles immediately.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/payments",
        &token,
        serde_json::json!({ "method": "cash" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let payment = body_json(response).await;
    assert_eq!(payment["status"], "successful");
    assert_eq!(payment["amount"], 25);
    assert!(payment["transaction_id"]
        .as_str()
        .unwrap()
        .starts_with("direct-"));

    // Subscription is now active with a billing date set.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/subscriptions/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let subscription = body_json(response).await;
    assert_eq!(subscription["status"], "active");
    assert_eq!(subscription["plan_price"], 25);
    assert!(subscription["next_payment_date"].is_string());

    // Onboarding is complete with every milestone flagged.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/onboarding", &token).await;
    let onboarding = body_json(response).await;
    assert_eq!(onboarding["step"], "complete");
    assert_eq!(onboarding["address_entered"], true);
    assert_eq!(onboarding["installation_scheduled"], true);
    assert_eq!(onboarding["payment_completed"], true);

    // The flow left a notification trail.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/notifications", &token).await;
    let notifications = body_json(response).await;
    let titles: Vec<&str> = notifications
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"Installation Scheduled"));
    assert!(titles.contains(&"New Subscription Created"));
    assert!(titles.contains(&"Payment Successful"));
}

/// Scheduling the installation before saving an address is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_schedule_requires_address(pool: PgPool) {
    let (token, _) = register(&pool, "noaddress@example.com", "0791000002").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/onboarding/schedule-installation",
        &token,
        serde_json::json!({ "date": "2026-09-01", "time": "10:00" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Save your address before scheduling installation");
}

/// The onboarding step never moves backwards.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_onboarding_step_is_forward_only(pool: PgPool) {
    let (token, _) = register(&pool, "forward@example.com", "0791000003").await;

    // Advance to the payment step.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/onboarding",
        &token,
        serde_json::json!({ "step": "payment" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Attempting to return to plan is rejected.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/onboarding",
        &token,
        serde_json::json!({ "step": "plan" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Re-asserting the current step is a no-op, not an error.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/onboarding",
        &token,
        serde_json::json!({ "step": "payment" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Milestone endpoints do not drag the step backwards either.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/onboarding/address",
        &token,
        serde_json::json!({
            "address": "5 Paris Circle",
            "city": "Amman",
            "lat": 31.95,
            "lng": 35.92,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/onboarding", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["step"], "payment");
    assert_eq!(json["address_entered"], true);
}

/// Paying twice activates once and records two payments; the plan change
/// endpoint reprices from settings.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_change_plan_after_payment(pool: PgPool) {
    let (token, _) = register(&pool, "premium@example.com", "0791000004").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/payments",
        &token,
        serde_json::json!({ "method": "cash" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Upgrade to premium: default premium price applies.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/subscriptions/change-plan",
        &token,
        serde_json::json!({ "plan": "premium" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let subscription = body_json(response).await;
    assert_eq!(subscription["plan"], "premium");
    assert_eq!(subscription["plan_price"], 35);
    assert_eq!(subscription["status"], "active");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/notifications", &token).await;
    let notifications = body_json(response).await;
    let titles: Vec<&str> = notifications
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"Subscription Plan Changed"));
}
