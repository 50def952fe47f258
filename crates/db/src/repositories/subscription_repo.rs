//! Repository for the `subscriptions` table.

use pureflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::subscription::{Subscription, UpdateSubscription};

/// Column list for `subscriptions` queries.
const COLUMNS: &str = "id, user_id, status, plan, plan_price, billing_interval, payment_method, \
                       next_payment_date, paused_until, cancel_reason, card_last4, card_type, \
                       stripe_customer_id, stripe_subscription_id, stripe_payment_intent_id, \
                       created_at, updated_at";

/// Provides CRUD operations for subscriptions.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Read-through-create: return the customer's subscription, creating a
    /// `pending` one at `plan_price` if none exists.
    ///
    /// Race-free under concurrent first reads: the insert lands on the
    /// `uq_subscriptions_user_id` constraint and silently loses, then both
    /// callers read the surviving row. Returns the row plus a flag telling
    /// the caller whether this call created it (drives the "subscription
    /// created" notification exactly once).
    pub async fn get_or_create(
        pool: &PgPool,
        user_id: DbId,
        plan_price: i64,
    ) -> Result<(Subscription, bool), sqlx::Error> {
        let query = format!(
            "INSERT INTO subscriptions (user_id, plan_price)
             VALUES ($1, $2)
             ON CONFLICT (user_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        if let Some(created) = sqlx::query_as::<_, Subscription>(&query)
            .bind(user_id)
            .bind(plan_price)
            .fetch_optional(pool)
            .await?
        {
            return Ok((created, true));
        }

        let select = format!("SELECT {COLUMNS} FROM subscriptions WHERE user_id = $1");
        let existing = sqlx::query_as::<_, Subscription>(&select)
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok((existing, false))
    }

    /// Find a subscription by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subscriptions WHERE id = $1");
        sqlx::query_as::<_, Subscription>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a customer's subscription, if any.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subscriptions WHERE user_id = $1");
        sqlx::query_as::<_, Subscription>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Merge-patch a subscription. Only non-`None` fields in `input` are
    /// applied. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSubscription,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "UPDATE subscriptions SET
                status = COALESCE($2, status),
                plan = COALESCE($3, plan),
                plan_price = COALESCE($4, plan_price),
                billing_interval = COALESCE($5, billing_interval),
                payment_method = COALESCE($6, payment_method),
                next_payment_date = COALESCE($7, next_payment_date),
                paused_until = COALESCE($8, paused_until),
                cancel_reason = COALESCE($9, cancel_reason),
                card_last4 = COALESCE($10, card_last4),
                card_type = COALESCE($11, card_type),
                stripe_customer_id = COALESCE($12, stripe_customer_id),
                stripe_subscription_id = COALESCE($13, stripe_subscription_id),
                stripe_payment_intent_id = COALESCE($14, stripe_payment_intent_id),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(&input.plan)
            .bind(input.plan_price)
            .bind(&input.billing_interval)
            .bind(&input.payment_method)
            .bind(input.next_payment_date)
            .bind(input.paused_until)
            .bind(&input.cancel_reason)
            .bind(&input.card_last4)
            .bind(&input.card_type)
            .bind(&input.stripe_customer_id)
            .bind(&input.stripe_subscription_id)
            .bind(&input.stripe_payment_intent_id)
            .fetch_optional(pool)
            .await
    }

    /// List all subscriptions, optionally filtered by status, newest first.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        match status {
            Some(status) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM subscriptions WHERE status = $1 ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, Subscription>(&query)
                    .bind(status)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!("SELECT {COLUMNS} FROM subscriptions ORDER BY created_at DESC");
                sqlx::query_as::<_, Subscription>(&query).fetch_all(pool).await
            }
        }
    }
}
