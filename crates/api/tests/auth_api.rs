//! HTTP-level integration tests for registration, login, and `/auth/me`.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, token_for};
use sqlx::PgPool;
use pureflow_db::repositories::OnboardingRepo;

fn register_body(email: &str, phone: &str) -> serde_json::Value {
    serde_json::json!({
        "email": email,
        "phone": phone,
        "password": "correct-horse-battery",
        "confirm_password": "correct-horse-battery",
    })
}

/// Registration returns 201 with a token and the new customer profile, and
/// the username is derived from the email local part.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_success(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app,
        "/api/v1/auth/register",
        register_body("maha@example.com", "0791234567"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["expires_in"].is_number());
    assert_eq!(json["user"]["username"], "maha");
    assert_eq!(json["user"]["role"], "customer");
    assert!(
        json["user"].get("password_hash").is_none(),
        "password hash must never be serialized"
    );

    // Registration seeds onboarding at the plan step.
    let user_id = json["user"]["id"].as_i64().unwrap();
    let onboarding = OnboardingRepo::find_by_user(&pool, user_id)
        .await
        .unwrap()
        .expect("onboarding row should exist after registration");
    assert_eq!(onboarding.step, "plan");
}

/// Registering twice with the same email returns 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_duplicate_email(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/register",
        register_body("dupe@example.com", "0791111111"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/register",
        register_body("dupe@example.com", "0792222222"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Email already in use");
}

/// Registering with a phone already on file returns 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_duplicate_phone(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/auth/register",
        register_body("first@example.com", "0793333333"),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/register",
        register_body("second@example.com", "0793333333"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Phone number already in use");
}

/// Mismatched password confirmation returns 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_password_mismatch(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({
            "email": "mismatch@example.com",
            "phone": "0794444444",
            "password": "correct-horse-battery",
            "confirm_password": "different-entirely",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Passwords under eight characters are rejected at registration.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_short_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({
            "email": "short@example.com",
            "phone": "0794444445",
            "password": "seven77",
            "confirm_password": "seven77",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Login with correct credentials returns 200 and a usable token.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/auth/register",
        register_body("login@example.com", "0795555555"),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({
            "email": "login@example.com",
            "password": "correct-horse-battery",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let token = json["access_token"].as_str().unwrap().to_string();

    // The token works against /auth/me.
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["email"], "login@example.com");
}

/// Login with a wrong password returns 401 with the same message a missing
/// account produces.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/auth/register",
        register_body("wrongpw@example.com", "0796666666"),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({
            "email": "wrongpw@example.com",
            "password": "not-the-password",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid email or password");
}

/// /auth/me without a token returns 401; with a token for a deleted user,
/// 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = common::get(app, "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool);
    let token = token_for(999_999, "customer");
    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
