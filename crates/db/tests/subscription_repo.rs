//! Integration tests for the subscription repository, in particular the
//! race-free get-or-create path that backs every "my subscription" read.

use pureflow_db::models::subscription::UpdateSubscription;
use pureflow_db::models::user::CreateUser;
use pureflow_db::repositories::{SubscriptionRepo, UserRepo};
use sqlx::PgPool;

async fn create_customer(pool: &PgPool, email: &str) -> i64 {
    let input = CreateUser {
        email: email.to_string(),
        phone: format!("+962-{email}"),
        username: email.split('@').next().unwrap().to_string(),
        password_hash: "x".to_string(),
        role: "customer".to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
        .id
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_or_create_creates_pending_subscription(pool: PgPool) {
    let user_id = create_customer(&pool, "new@test.com").await;

    let (sub, created) = SubscriptionRepo::get_or_create(&pool, user_id, 25)
        .await
        .expect("get_or_create should succeed");

    assert!(created, "first call must create the row");
    assert_eq!(sub.user_id, user_id);
    assert_eq!(sub.status, "pending");
    assert_eq!(sub.plan, "basic");
    assert_eq!(sub.plan_price, 25);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_or_create_is_idempotent(pool: PgPool) {
    let user_id = create_customer(&pool, "repeat@test.com").await;

    let (first, created_first) = SubscriptionRepo::get_or_create(&pool, user_id, 25)
        .await
        .unwrap();
    let (second, created_second) = SubscriptionRepo::get_or_create(&pool, user_id, 99)
        .await
        .unwrap();

    assert!(created_first);
    assert!(!created_second, "second call must not create a new row");
    assert_eq!(first.id, second.id);
    // The losing price is discarded; the original row survives.
    assert_eq!(second.plan_price, 25);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_or_create_concurrent_single_row(pool: PgPool) {
    let user_id = create_customer(&pool, "race@test.com").await;

    let a = tokio::spawn({
        let pool = pool.clone();
        async move { SubscriptionRepo::get_or_create(&pool, user_id, 25).await }
    });
    let b = tokio::spawn({
        let pool = pool.clone();
        async move { SubscriptionRepo::get_or_create(&pool, user_id, 25).await }
    });

    let (sub_a, _) = a.await.unwrap().expect("task a should succeed");
    let (sub_b, _) = b.await.unwrap().expect("task b should succeed");
    assert_eq!(sub_a.id, sub_b.id, "both callers must see the same row");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1, "exactly one subscription row must exist");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_is_a_merge_patch(pool: PgPool) {
    let user_id = create_customer(&pool, "patch@test.com").await;
    let (sub, _) = SubscriptionRepo::get_or_create(&pool, user_id, 25).await.unwrap();

    let patch = UpdateSubscription {
        status: Some("active".to_string()),
        card_last4: Some("4242".to_string()),
        ..Default::default()
    };
    let updated = SubscriptionRepo::update(&pool, sub.id, &patch)
        .await
        .unwrap()
        .expect("row must exist");

    assert_eq!(updated.status, "active");
    assert_eq!(updated.card_last4.as_deref(), Some("4242"));
    // Untouched fields keep their values.
    assert_eq!(updated.plan, "basic");
    assert_eq!(updated.plan_price, 25);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_missing_subscription_returns_none(pool: PgPool) {
    let patch = UpdateSubscription::default();
    let result = SubscriptionRepo::update(&pool, 9999, &patch).await.unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_filters_by_status(pool: PgPool) {
    let active_user = create_customer(&pool, "active@test.com").await;
    let pending_user = create_customer(&pool, "pending@test.com").await;

    let (active_sub, _) = SubscriptionRepo::get_or_create(&pool, active_user, 25).await.unwrap();
    SubscriptionRepo::get_or_create(&pool, pending_user, 25).await.unwrap();

    let patch = UpdateSubscription {
        status: Some("active".to_string()),
        ..Default::default()
    };
    SubscriptionRepo::update(&pool, active_sub.id, &patch).await.unwrap();

    let active = SubscriptionRepo::list(&pool, Some("active")).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].user_id, active_user);

    let all = SubscriptionRepo::list(&pool, None).await.unwrap();
    assert_eq!(all.len(), 2);
}
