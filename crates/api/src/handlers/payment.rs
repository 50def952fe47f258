//! Handlers for the `/payments` resource.
//!
//! Direct payments (card details keyed in, or cash on delivery) settle
//! immediately: the payment is recorded, the subscription activates, and
//! the onboarding flow completes. Gateway payments go through the stripe
//! handlers instead and settle via webhook.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use pureflow_core::error::CoreError;
use pureflow_core::onboarding::OnboardingStep;
use pureflow_core::payment::{direct_transaction_id, PaymentMethod, PaymentStatus};
use pureflow_core::subscription::{next_payment_date, SubscriptionStatus};
use pureflow_db::models::onboarding::OnboardingPatch;
use pureflow_db::models::payment::{CreatePayment, Payment, PaymentFilters, UpdatePayment};
use pureflow_db::models::subscription::UpdateSubscription;
use pureflow_db::models::user::UserResponse;
use pureflow_db::repositories::{OnboardingRepo, PaymentRepo, SubscriptionRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::subscription::ensure_subscription;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::notify;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Card display fields captured with a direct card payment.
#[derive(Debug, Deserialize)]
pub struct CardDetails {
    pub last4: String,
    pub card_type: String,
}

/// Request body for `POST /payments`.
#[derive(Debug, Deserialize)]
pub struct CreateDirectPaymentRequest {
    pub method: String,
    #[serde(default)]
    pub card_details: Option<CardDetails>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/payments
///
/// Record a direct payment at the subscription's plan price and settle it
/// immediately: payment flips to successful, the subscription activates
/// with a fresh billing date, and onboarding completes.
pub async fn create_direct(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateDirectPaymentRequest>,
) -> AppResult<(StatusCode, Json<Payment>)> {
    let method: PaymentMethod = input.method.parse().map_err(AppError::Core)?;

    let (subscription, _) = ensure_subscription(&state, auth.user_id).await?;

    let payment = PaymentRepo::create(
        &state.pool,
        &CreatePayment {
            user_id: auth.user_id,
            subscription_id: Some(subscription.id),
            amount: subscription.plan_price,
            status: PaymentStatus::Pending.as_str().to_string(),
            method: method.as_str().to_string(),
            transaction_id: direct_transaction_id(),
        },
    )
    .await?;

    // Card display fields land on both the payment and the subscription so
    // the dashboard and receipts agree on what was charged.
    let card = input.card_details.as_ref();
    let payment = PaymentRepo::update(
        &state.pool,
        payment.id,
        &UpdatePayment {
            status: Some(PaymentStatus::Successful.as_str().to_string()),
            card_last4: card.map(|c| c.last4.clone()),
            card_type: card.map(|c| c.card_type.clone()),
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Payment",
        id: payment.id,
    }))?;

    let current_status: SubscriptionStatus =
        subscription.status.parse().map_err(AppError::Core)?;
    let sub_patch = UpdateSubscription {
        status: (current_status != SubscriptionStatus::Active)
            .then(|| SubscriptionStatus::Active.as_str().to_string()),
        next_payment_date: Some(next_payment_date()),
        payment_method: Some(method.as_str().to_string()),
        card_last4: card.map(|c| c.last4.clone()),
        card_type: card.map(|c| c.card_type.clone()),
        ..Default::default()
    };
    SubscriptionRepo::update(&state.pool, subscription.id, &sub_patch).await?;

    complete_onboarding(&state, auth.user_id).await?;

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    notify::notify_user_and_admins(
        &state.pool,
        auth.user_id,
        "Payment Successful",
        &format!(
            "Your payment of {} JOD has been processed successfully.",
            payment.amount
        ),
        "New Payment Received",
        &format!(
            "Payment of {} JOD has been received from {} (ID: {}).",
            payment.amount, user.username, user.id
        ),
    )
    .await?;

    tracing::info!(
        payment_id = payment.id,
        user_id = auth.user_id,
        method = %method,
        "Direct payment settled"
    );

    Ok((StatusCode::CREATED, Json(payment)))
}

/// GET /api/v1/payments/me
///
/// The customer's payment history, newest first.
pub async fn list_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Payment>>> {
    let payments = PaymentRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(payments))
}

/// GET /api/v1/payments
///
/// Admin report across all payments, filterable by status, method, and
/// date range, each row enriched with the paying customer.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(filters): Query<PaymentFilters>,
) -> AppResult<Json<serde_json::Value>> {
    if let Some(status) = &filters.status {
        status.parse::<PaymentStatus>().map_err(AppError::Core)?;
    }
    if let Some(method) = &filters.method {
        method.parse::<PaymentMethod>().map_err(AppError::Core)?;
    }

    let payments = PaymentRepo::list_all(&state.pool, &filters).await?;

    let mut rows = Vec::with_capacity(payments.len());
    for payment in payments {
        let user = UserRepo::find_by_id(&state.pool, payment.user_id)
            .await?
            .map(UserResponse::from);
        let mut row = serde_json::json!(payment);
        row["user"] = serde_json::json!(user);
        rows.push(row);
    }

    Ok(Json(serde_json::json!({ "data": rows })))
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Mark onboarding paid and complete, without ever moving the step back.
pub(crate) async fn complete_onboarding(
    state: &AppState,
    user_id: pureflow_core::types::DbId,
) -> Result<(), AppError> {
    let current: OnboardingStep = match OnboardingRepo::find_by_user(&state.pool, user_id).await? {
        Some(row) => row.step.parse().map_err(AppError::Core)?,
        None => OnboardingStep::Account,
    };

    let patch = OnboardingPatch {
        step: current
            .can_advance_to(OnboardingStep::Complete)
            .then(|| OnboardingStep::Complete.as_str().to_string()),
        payment_completed: Some(true),
        ..Default::default()
    };
    OnboardingRepo::upsert(&state.pool, user_id, &patch).await?;
    Ok(())
}
