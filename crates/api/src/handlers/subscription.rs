//! Handlers for the `/subscriptions` resource.
//!
//! Customers read (and implicitly create) their own subscription; admins
//! list and patch everyone's. Status changes are validated against the
//! subscription status machine before touching the database.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pureflow_core::error::CoreError;
use pureflow_core::plans::{Plan, DEFAULT_PLAN_PRICE, PLAN_PRICE_KEY};
use pureflow_core::subscription::{next_payment_date, SubscriptionStatus};
use pureflow_core::types::DbId;
use pureflow_db::models::subscription::{Subscription, UpdateSubscription};
use pureflow_db::models::user::UserResponse;
use pureflow_db::repositories::{SubscriptionRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::notify;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / query types
// ---------------------------------------------------------------------------

/// Request body for `POST /subscriptions/change-plan`.
#[derive(Debug, Deserialize)]
pub struct ChangePlanRequest {
    pub plan: String,
}

/// Request body for `POST /subscriptions/update-payment`.
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentMethodRequest {
    pub card_type: String,
    pub card_last4: String,
}

/// Query parameters for the admin listing.
#[derive(Debug, Deserialize)]
pub struct SubscriptionListQuery {
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Customer endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/subscriptions/me
///
/// Return the customer's subscription, creating a pending one at the
/// current plan price if none exists. Creation notifies the customer and
/// the admin team exactly once, however many concurrent first reads race.
pub async fn get_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Subscription>> {
    let (subscription, _) = ensure_subscription(&state, auth.user_id).await?;
    Ok(Json(subscription))
}

/// POST /api/v1/subscriptions
///
/// Explicitly create the customer's subscription. 409 if one exists.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Subscription>)> {
    if SubscriptionRepo::find_by_user(&state.pool, auth.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "User already has a subscription".into(),
        )));
    }

    let (subscription, _) = ensure_subscription(&state, auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(subscription)))
}

/// PATCH /api/v1/subscriptions/me
///
/// Merge-patch the customer's own subscription. Status changes are checked
/// against the status machine; lifecycle notifications fan out afterwards.
pub async fn patch_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(mut patch): Json<UpdateSubscription>,
) -> AppResult<Json<Subscription>> {
    let current = SubscriptionRepo::find_by_user(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subscription",
            id: auth.user_id,
        }))?;

    validate_patch(&current, &mut patch)?;

    let updated = SubscriptionRepo::update(&state.pool, current.id, &patch)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subscription",
            id: current.id,
        }))?;

    send_lifecycle_notifications(&state, auth.user_id, &current, &patch, &updated).await?;

    Ok(Json(updated))
}

/// POST /api/v1/subscriptions/change-plan
///
/// Switch between the basic and premium plans at the current configured
/// price, activating the subscription in the process.
pub async fn change_plan(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChangePlanRequest>,
) -> AppResult<Json<Subscription>> {
    let plan: Plan = input.plan.parse().map_err(AppError::Core)?;

    let current = SubscriptionRepo::find_by_user(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subscription",
            id: auth.user_id,
        }))?;

    let price = state
        .settings
        .get_int(&state.pool, plan.price_key(), plan.default_price())
        .await?;

    // Changing plans puts the subscription on the new plan's billing track;
    // a same-status write is skipped rather than rejected.
    let current_status: SubscriptionStatus = current.status.parse().map_err(AppError::Core)?;
    let status = (current_status != SubscriptionStatus::Active)
        .then(|| SubscriptionStatus::Active.as_str().to_string());

    let patch = UpdateSubscription {
        plan: Some(plan.as_str().to_string()),
        plan_price: Some(price),
        status,
        ..Default::default()
    };
    let updated = SubscriptionRepo::update(&state.pool, current.id, &patch)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subscription",
            id: current.id,
        }))?;

    notify::notify_user(
        &state.pool,
        auth.user_id,
        "Subscription Plan Changed",
        &format!(
            "Your subscription plan has been changed to {}. Your new monthly price is ${price}.",
            plan.display_name()
        ),
    )
    .await?;

    Ok(Json(updated))
}

/// POST /api/v1/subscriptions/update-payment
///
/// Store new card display fields and switch the payment method to card.
pub async fn update_payment_method(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdatePaymentMethodRequest>,
) -> AppResult<Json<Subscription>> {
    if input.card_type.is_empty() || input.card_last4.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Card information is required".into(),
        )));
    }

    let current = SubscriptionRepo::find_by_user(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subscription",
            id: auth.user_id,
        }))?;

    let patch = UpdateSubscription {
        card_type: Some(input.card_type.clone()),
        card_last4: Some(input.card_last4.clone()),
        payment_method: Some("card".to_string()),
        ..Default::default()
    };
    let updated = SubscriptionRepo::update(&state.pool, current.id, &patch)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subscription",
            id: current.id,
        }))?;

    notify::notify_user(
        &state.pool,
        auth.user_id,
        "Payment Method Updated",
        &format!(
            "Your payment method has been updated to {} ending in {}.",
            input.card_type, input.card_last4
        ),
    )
    .await?;

    Ok(Json(updated))
}

// ---------------------------------------------------------------------------
// Admin endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/subscriptions
///
/// List all subscriptions, optionally filtered by status, each enriched
/// with its customer for the dashboard.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<SubscriptionListQuery>,
) -> AppResult<Json<serde_json::Value>> {
    if let Some(status) = &query.status {
        status
            .parse::<SubscriptionStatus>()
            .map_err(AppError::Core)?;
    }

    let subscriptions = SubscriptionRepo::list(&state.pool, query.status.as_deref()).await?;

    let mut rows = Vec::with_capacity(subscriptions.len());
    for subscription in subscriptions {
        let user = UserRepo::find_by_id(&state.pool, subscription.user_id)
            .await?
            .map(UserResponse::from);
        let mut row = serde_json::json!(subscription);
        row["user"] = serde_json::json!(user);
        rows.push(row);
    }

    Ok(Json(serde_json::json!({ "data": rows })))
}

/// PATCH /api/v1/subscriptions/{id}
///
/// Admin merge-patch on any subscription, same status-machine rules as the
/// self-service patch but without customer notifications.
pub async fn admin_patch(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut patch): Json<UpdateSubscription>,
) -> AppResult<Json<Subscription>> {
    let current = SubscriptionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subscription",
            id,
        }))?;

    validate_patch(&current, &mut patch)?;

    let updated = SubscriptionRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subscription",
            id,
        }))?;

    Ok(Json(updated))
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Get or create the user's subscription at the configured plan price.
///
/// On creation, the customer and the admin team are notified in one batch.
/// The created flag from the repository guarantees the fan-out happens once
/// even when concurrent requests race on the first read.
pub(crate) async fn ensure_subscription(
    state: &AppState,
    user_id: DbId,
) -> Result<(Subscription, bool), AppError> {
    let plan_price = state
        .settings
        .get_int(&state.pool, PLAN_PRICE_KEY, DEFAULT_PLAN_PRICE)
        .await?;

    let (subscription, created) =
        SubscriptionRepo::get_or_create(&state.pool, user_id, plan_price).await?;

    if created {
        let user = UserRepo::find_by_id(&state.pool, user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: user_id,
            }))?;

        notify::notify_user_and_admins(
            &state.pool,
            user_id,
            "New Subscription Created",
            &format!(
                "Your water filter subscription has been created. \
                 Your plan costs ${plan_price} per month."
            ),
            "New Subscription",
            &format!(
                "A new subscription has been created for user {} (ID: {}).",
                user.username, user.id
            ),
        )
        .await?;
    }

    Ok((subscription, created))
}

/// Check a merge-patch against the current row.
///
/// Status transitions must be legal; a same-status write is dropped from
/// the patch rather than rejected so idempotent clients see a no-op. An
/// unknown plan string is rejected.
fn validate_patch(
    current: &Subscription,
    patch: &mut UpdateSubscription,
) -> Result<(), AppError> {
    if let Some(status) = &patch.status {
        let target: SubscriptionStatus = status.parse().map_err(AppError::Core)?;
        let current_status: SubscriptionStatus = current.status.parse().map_err(AppError::Core)?;
        if target == current_status {
            patch.status = None;
        } else if !current_status.can_transition_to(target) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Cannot change subscription status from '{current_status}' to '{target}'"
            ))));
        }
    }

    if let Some(plan) = &patch.plan {
        plan.parse::<Plan>().map_err(AppError::Core)?;
    }

    Ok(())
}

/// Fan out the pause / cancel / reactivate / plan-change notifications
/// after a successful self-service patch.
async fn send_lifecycle_notifications(
    state: &AppState,
    user_id: DbId,
    before: &Subscription,
    patch: &UpdateSubscription,
    after: &Subscription,
) -> Result<(), AppError> {
    match patch.status.as_deref() {
        Some("paused") => {
            let until = after.paused_until.unwrap_or_else(next_payment_date);
            notify::notify_user(
                &state.pool,
                user_id,
                "Subscription Paused",
                &format!(
                    "Your subscription has been paused until {}.",
                    until.format("%Y-%m-%d")
                ),
            )
            .await?;
        }
        Some("cancelled") => {
            let user = UserRepo::find_by_id(&state.pool, user_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "User",
                    id: user_id,
                }))?;
            let reason = patch
                .cancel_reason
                .clone()
                .unwrap_or_else(|| "No reason provided".to_string());
            notify::notify_user_and_admins(
                &state.pool,
                user_id,
                "Subscription Cancelled",
                "Your subscription has been cancelled. \
                 You will no longer be billed for this service.",
                "Subscription Cancelled",
                &format!(
                    "User {} (ID: {}) has cancelled their subscription. Reason: {reason}",
                    user.username, user.id
                ),
            )
            .await?;
        }
        Some("active") => {
            let next_billing = after
                .next_payment_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "soon".to_string());
            notify::notify_user(
                &state.pool,
                user_id,
                "Subscription Reactivated",
                &format!(
                    "Your subscription has been reactivated. \
                     Your next billing date is {next_billing}."
                ),
            )
            .await?;
        }
        _ => {}
    }

    if let Some(plan) = &patch.plan {
        if plan != &before.plan {
            let display = plan
                .parse::<Plan>()
                .map(|p| p.display_name().to_string())
                .unwrap_or_else(|_| plan.clone());
            notify::notify_user(
                &state.pool,
                user_id,
                "Subscription Plan Changed",
                &format!(
                    "Your subscription plan has been changed to {display}. \
                     The new price is ${} per month.",
                    after.plan_price
                ),
            )
            .await?;
        }
    }

    Ok(())
}
