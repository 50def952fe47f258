//! Role and relation enforcement across the API surface.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, patch_json_auth, post_json_auth, token_for};
use pureflow_api::auth::password::hash_password;
use pureflow_db::models::user::{CreateUser, User};
use pureflow_db::repositories::UserRepo;
use sqlx::PgPool;

/// Create a user with the given role directly in the database.
async fn create_user(pool: &PgPool, email: &str, phone: &str, role: &str) -> User {
    let password_hash = hash_password("test_password_123!").expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            phone: phone.to_string(),
            username: email.split('@').next().unwrap().to_string(),
            password_hash,
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Create a job for `customer` via the admin endpoint, returning its id.
async fn create_job(
    pool: &PgPool,
    admin_token: &str,
    customer_id: i64,
    technician_id: Option<i64>,
) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/jobs",
        admin_token,
        serde_json::json!({
            "user_id": customer_id,
            "technician_id": technician_id,
            "job_type": "filter_change",
            "scheduled_for": "2026-09-10T09:00:00Z",
            "scheduled_end_time": "2026-09-10T11:00:00Z",
            "notes": "Quarterly filter change",
            "address": "12 Rainbow Street",
            "address_lat": 31.95,
            "address_lng": 35.92,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Customers and technicians are shut out of admin-only endpoints.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_endpoints_rejected_for_non_admins(pool: PgPool) {
    let customer = create_user(&pool, "cust@example.com", "0790000001", "customer").await;
    let technician = create_user(&pool, "tech@example.com", "0790000002", "technician").await;

    for (user, role) in [(&customer, "customer"), (&technician, "technician")] {
        let token = token_for(user.id, role);
        for uri in ["/api/v1/jobs", "/api/v1/payments", "/api/v1/subscriptions", "/api/v1/technicians", "/api/v1/users?role=customer"] {
            let app = common::build_test_app(pool.clone());
            let response = get_auth(app, uri, &token).await;
            assert_eq!(
                response.status(),
                StatusCode::FORBIDDEN,
                "{role} should be denied {uri}"
            );
        }
    }
}

/// The technician-only listing admits technicians and admins but not
/// customers.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_assigned_listing_role_gate(pool: PgPool) {
    let customer = create_user(&pool, "cust2@example.com", "0790000003", "customer").await;
    let technician = create_user(&pool, "tech2@example.com", "0790000004", "technician").await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(
        app,
        "/api/v1/jobs/technician",
        &token_for(customer.id, "customer"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        "/api/v1/jobs/technician",
        &token_for(technician.id, "technician"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Job reads are relation-gated: owner and assigned technician only.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_job_read_relations(pool: PgPool) {
    let admin = create_user(&pool, "admin@example.com", "0790000005", "admin").await;
    let owner = create_user(&pool, "owner@example.com", "0790000006", "customer").await;
    let other = create_user(&pool, "other@example.com", "0790000007", "customer").await;
    let assigned = create_user(&pool, "assigned@example.com", "0790000008", "technician").await;
    let bystander = create_user(&pool, "bystander@example.com", "0790000009", "technician").await;

    let admin_token = token_for(admin.id, "admin");
    let job_id = create_job(&pool, &admin_token, owner.id, Some(assigned.id)).await;
    let uri = format!("/api/v1/jobs/{job_id}");

    for (user, role, expected) in [
        (&owner, "customer", StatusCode::OK),
        (&other, "customer", StatusCode::FORBIDDEN),
        (&assigned, "technician", StatusCode::OK),
        (&bystander, "technician", StatusCode::FORBIDDEN),
        (&admin, "admin", StatusCode::OK),
    ] {
        let app = common::build_test_app(pool.clone());
        let response = get_auth(app, &uri, &token_for(user.id, role)).await;
        assert_eq!(response.status(), expected, "{role} read gate mismatch");
    }
}

/// Only the assigned technician (or an admin) may progress a job, and only
/// along legal transitions.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_job_status_transitions(pool: PgPool) {
    let admin = create_user(&pool, "admin2@example.com", "0790000010", "admin").await;
    let owner = create_user(&pool, "owner2@example.com", "0790000011", "customer").await;
    let assigned = create_user(&pool, "assigned2@example.com", "0790000012", "technician").await;

    let admin_token = token_for(admin.id, "admin");
    let job_id = create_job(&pool, &admin_token, owner.id, Some(assigned.id)).await;
    let uri = format!("/api/v1/jobs/{job_id}/status");
    let tech_token = token_for(assigned.id, "technician");

    // The customer cannot progress their own job.
    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &uri,
        &token_for(owner.id, "customer"),
        serde_json::json!({ "status": "en_route" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The assigned technician can.
    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &uri,
        &tech_token,
        serde_json::json!({ "status": "en_route" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "en_route");

    // Rewinding is illegal.
    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &uri,
        &tech_token,
        serde_json::json!({ "status": "scheduled" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // So is a same-status write.
    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &uri,
        &tech_token,
        serde_json::json!({ "status": "en_route" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Completing with a proof photo sticks, and terminal means terminal.
    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &uri,
        &tech_token,
        serde_json::json!({ "status": "arrived" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &uri,
        &tech_token,
        serde_json::json!({ "status": "completed", "photo_proof": "proof/123.jpg" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let job = body_json(response).await;
    assert_eq!(job["status"], "completed");
    assert_eq!(job["photo_proof"], "proof/123.jpg");

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &uri,
        &tech_token,
        serde_json::json!({ "status": "cancelled" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Assignment validates the target's role.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_assign_requires_technician_role(pool: PgPool) {
    let admin = create_user(&pool, "admin3@example.com", "0790000013", "admin").await;
    let owner = create_user(&pool, "owner3@example.com", "0790000014", "customer").await;
    let technician = create_user(&pool, "tech3@example.com", "0790000015", "technician").await;

    let admin_token = token_for(admin.id, "admin");
    let job_id = create_job(&pool, &admin_token, owner.id, None).await;
    let uri = format!("/api/v1/jobs/{job_id}/assign");

    // Assigning a customer is rejected.
    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &uri,
        &admin_token,
        serde_json::json!({ "technician_id": owner.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid technician");

    // Assigning a real technician works and notifies them.
    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &uri,
        &admin_token,
        serde_json::json!({ "technician_id": technician.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["technician_id"],
        technician.id
    );

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        "/api/v1/notifications",
        &token_for(technician.id, "technician"),
    )
    .await;
    let notifications = body_json(response).await;
    assert!(notifications
        .as_array()
        .unwrap()
        .iter()
        .any(|n| n["title"] == "New Job Assigned"));
}

/// Admin-created technicians can log in; the creation endpoint echoes the
/// public profile only.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_technician(pool: PgPool) {
    let admin = create_user(&pool, "admin4@example.com", "0790000016", "admin").await;
    let admin_token = token_for(admin.id, "admin");

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/technicians",
        &admin_token,
        serde_json::json!({
            "email": "newtech@example.com",
            "phone": "0790000017",
            "username": "newtech",
            "password": "a-strong-password",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["role"], "technician");
    assert!(json.get("password_hash").is_none());

    let app = common::build_test_app(pool);
    let response = common::post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({
            "email": "newtech@example.com",
            "password": "a-strong-password",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
