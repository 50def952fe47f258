//! Subscription entity model and DTOs.

use pureflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `subscriptions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: DbId,
    pub user_id: DbId,
    pub status: String,
    pub plan: String,
    pub plan_price: i64,
    pub billing_interval: String,
    pub payment_method: Option<String>,
    pub next_payment_date: Option<Timestamp>,
    pub paused_until: Option<Timestamp>,
    pub cancel_reason: Option<String>,
    pub card_last4: Option<String>,
    pub card_type: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub stripe_payment_intent_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for patching a subscription. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubscription {
    pub status: Option<String>,
    pub plan: Option<String>,
    pub plan_price: Option<i64>,
    pub billing_interval: Option<String>,
    pub payment_method: Option<String>,
    pub next_payment_date: Option<Timestamp>,
    pub paused_until: Option<Timestamp>,
    pub cancel_reason: Option<String>,
    pub card_last4: Option<String>,
    pub card_type: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub stripe_payment_intent_id: Option<String>,
}
