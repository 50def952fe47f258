//! Handlers for the `/stripe` resource: payment intents and the webhook.
//!
//! Gateway payments settle asynchronously: the client confirms the intent
//! browser-side and the webhook delivers the outcome. The webhook endpoint
//! is public; authenticity comes from the signature header, verified
//! against the endpoint's signing secret before any parsing.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use pureflow_core::error::CoreError;
use pureflow_core::payment::{PaymentMethod, PaymentStatus};
use pureflow_core::subscription::{next_payment_date, SubscriptionStatus};
use pureflow_core::types::DbId;
use pureflow_db::models::payment::CreatePayment;
use pureflow_db::models::subscription::UpdateSubscription;
use pureflow_db::repositories::{PaymentRepo, SubscriptionRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::payment::complete_onboarding;
use crate::handlers::subscription::ensure_subscription;
use crate::middleware::auth::AuthUser;
use crate::notify;
use crate::state::AppState;
use crate::stripe::client::StripeClient;
use crate::stripe::webhook::{
    verify_signature, PaymentIntentObject, WebhookEvent, EVENT_PAYMENT_FAILED,
    EVENT_PAYMENT_SUCCEEDED,
};

/// Gateway charges are denominated in this currency.
const INTENT_CURRENCY: &str = "usd";

// ---------------------------------------------------------------------------
// Authenticated endpoints
// ---------------------------------------------------------------------------

/// POST /api/v1/stripe/create-payment-intent
///
/// One-off intent for the subscription's plan price, without attaching a
/// customer. Returns the client secret for browser-side confirmation.
pub async fn create_payment_intent(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let client = require_client(&state)?;
    let (subscription, _) = ensure_subscription(&state, auth.user_id).await?;

    let intent = client
        .create_payment_intent(
            subscription.plan_price * 100,
            INTENT_CURRENCY,
            None,
            auth.user_id,
            subscription.id,
        )
        .await?;

    Ok(Json(serde_json::json!({
        "client_secret": intent.client_secret,
    })))
}

/// POST /api/v1/stripe/get-or-create-subscription
///
/// Recurring-billing setup: ensure a Stripe customer exists for the user,
/// create an intent that saves the card for off-session reuse, and stash
/// the gateway ids on the subscription row.
pub async fn get_or_create_subscription(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let client = require_client(&state)?;
    let (subscription, _) = ensure_subscription(&state, auth.user_id).await?;

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    let customer_id = match &subscription.stripe_customer_id {
        Some(id) => id.clone(),
        None => {
            let customer = client
                .create_customer(&user.email, &user.username, user.id)
                .await?;
            customer.id
        }
    };

    let intent = client
        .create_payment_intent(
            subscription.plan_price * 100,
            INTENT_CURRENCY,
            Some(&customer_id),
            auth.user_id,
            subscription.id,
        )
        .await?;

    let patch = UpdateSubscription {
        stripe_customer_id: Some(customer_id),
        stripe_payment_intent_id: Some(intent.id.clone()),
        ..Default::default()
    };
    SubscriptionRepo::update(&state.pool, subscription.id, &patch).await?;

    Ok(Json(serde_json::json!({
        "client_secret": intent.client_secret,
    })))
}

// ---------------------------------------------------------------------------
// Webhook
// ---------------------------------------------------------------------------

/// POST /api/v1/stripe/webhook
///
/// Gateway event sink. Signature is checked against the raw body before
/// parsing; unknown event types are acknowledged so Stripe stops retrying.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<serde_json::Value>> {
    if let Some(secret) = &state.config.stripe.webhook_secret {
        let signature = headers
            .get("stripe-signature")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing webhook signature".into()))
            })?;
        if !verify_signature(body.as_bytes(), signature, secret) {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid webhook signature".into(),
            )));
        }
    }

    let event: WebhookEvent = serde_json::from_str(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid webhook payload: {e}")))?;

    match event.event_type.as_str() {
        EVENT_PAYMENT_SUCCEEDED => handle_payment_succeeded(&state, &event.data.object).await?,
        EVENT_PAYMENT_FAILED => handle_payment_failed(&state, &event.data.object).await?,
        other => {
            tracing::debug!(event_type = other, "Ignoring unhandled webhook event");
        }
    }

    Ok(Json(serde_json::json!({ "received": true })))
}

/// Settle a succeeded intent: record the payment, activate the subscription,
/// copy card display fields, complete onboarding, and fan out notifications.
async fn handle_payment_succeeded(
    state: &AppState,
    intent: &PaymentIntentObject,
) -> Result<(), AppError> {
    let Some((user_id, subscription_id)) = correlate(intent) else {
        tracing::warn!(intent_id = %intent.id, "Webhook intent without local metadata");
        return Ok(());
    };

    let amount = intent.amount / 100;
    PaymentRepo::create(
        &state.pool,
        &CreatePayment {
            user_id,
            subscription_id: Some(subscription_id),
            amount,
            status: PaymentStatus::Successful.as_str().to_string(),
            method: PaymentMethod::Card.as_str().to_string(),
            transaction_id: intent.id.clone(),
        },
    )
    .await?;

    let subscription = SubscriptionRepo::find_by_id(&state.pool, subscription_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subscription",
            id: subscription_id,
        }))?;
    let current: SubscriptionStatus = subscription.status.parse().map_err(AppError::Core)?;

    // Card display fields come from the attached payment method when the
    // gateway client is configured; best effort, the payment stands without.
    let card = match (&state.stripe, &intent.payment_method) {
        (Some(client), Some(pm_id)) => client
            .retrieve_payment_method(pm_id)
            .await
            .ok()
            .and_then(|pm| pm.card),
        _ => None,
    };

    let patch = UpdateSubscription {
        status: (current != SubscriptionStatus::Active
            && current.can_transition_to(SubscriptionStatus::Active))
        .then(|| SubscriptionStatus::Active.as_str().to_string()),
        next_payment_date: Some(next_payment_date()),
        payment_method: Some(PaymentMethod::Card.as_str().to_string()),
        card_last4: card.as_ref().map(|c| c.last4.clone()),
        card_type: card.as_ref().map(|c| c.brand.clone()),
        ..Default::default()
    };
    SubscriptionRepo::update(&state.pool, subscription_id, &patch).await?;

    complete_onboarding(state, user_id).await?;

    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    notify::notify_user_and_admins(
        &state.pool,
        user_id,
        "Payment Successful",
        &format!("Your payment of {amount} JOD has been processed successfully."),
        "New Payment Received",
        &format!(
            "Payment of {amount} JOD has been received from {} (ID: {}).",
            user.username, user.id
        ),
    )
    .await?;

    tracing::info!(intent_id = %intent.id, user_id, "Gateway payment settled");
    Ok(())
}

/// Record a failed intent and push the subscription into `payment_failed`.
async fn handle_payment_failed(
    state: &AppState,
    intent: &PaymentIntentObject,
) -> Result<(), AppError> {
    let Some((user_id, subscription_id)) = correlate(intent) else {
        tracing::warn!(intent_id = %intent.id, "Webhook intent without local metadata");
        return Ok(());
    };

    PaymentRepo::create(
        &state.pool,
        &CreatePayment {
            user_id,
            subscription_id: Some(subscription_id),
            amount: intent.amount / 100,
            status: PaymentStatus::Failed.as_str().to_string(),
            method: PaymentMethod::Card.as_str().to_string(),
            transaction_id: intent.id.clone(),
        },
    )
    .await?;

    if let Some(subscription) = SubscriptionRepo::find_by_id(&state.pool, subscription_id).await? {
        let current: SubscriptionStatus = subscription.status.parse().map_err(AppError::Core)?;
        if current.can_transition_to(SubscriptionStatus::PaymentFailed) {
            let patch = UpdateSubscription {
                status: Some(SubscriptionStatus::PaymentFailed.as_str().to_string()),
                ..Default::default()
            };
            SubscriptionRepo::update(&state.pool, subscription_id, &patch).await?;
        }
    }

    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    notify::notify_user_and_admins(
        &state.pool,
        user_id,
        "Payment Failed",
        "Your payment attempt has failed. Please update your payment method.",
        "Payment Failed",
        &format!(
            "A payment attempt by {} (ID: {}) has failed.",
            user.username, user.id
        ),
    )
    .await?;

    tracing::warn!(intent_id = %intent.id, user_id, "Gateway payment failed");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require_client(state: &AppState) -> Result<&StripeClient, AppError> {
    state
        .stripe
        .as_deref()
        .ok_or_else(|| AppError::Core(CoreError::Downstream("Payment gateway not configured".into())))
}

/// Pull the local ids out of intent metadata.
fn correlate(intent: &PaymentIntentObject) -> Option<(DbId, DbId)> {
    let user_id = intent.metadata.get("user_id")?.parse::<DbId>().ok()?;
    let subscription_id = intent
        .metadata
        .get("subscription_id")?
        .parse::<DbId>()
        .ok()?;
    Some((user_id, subscription_id))
}
