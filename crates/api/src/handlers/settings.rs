//! Platform settings: plan pricing.

use axum::extract::State;
use axum::Json;
use pureflow_core::error::CoreError;
use pureflow_core::plans::{Plan, DEFAULT_PLAN_PRICE, PLAN_PRICE_KEY};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Request body for `POST /settings/plan-price`.
#[derive(Debug, Deserialize)]
pub struct UpdatePlanPriceRequest {
    pub price: i64,
    /// Which plan's price to set; the default plan price when absent.
    #[serde(default)]
    pub plan: Option<String>,
}

/// GET /api/v1/plan-price
///
/// Public: the default monthly plan price, shown on the signup screen
/// before the customer has an account.
pub async fn get_plan_price(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    let price = state
        .settings
        .get_int(&state.pool, PLAN_PRICE_KEY, DEFAULT_PLAN_PRICE)
        .await?;
    Ok(Json(serde_json::json!({ "price": price })))
}

/// POST /api/v1/settings/plan-price
///
/// Admin updates a plan price. Takes effect immediately for new
/// subscriptions and plan changes; existing subscriptions keep the price
/// they were created with.
pub async fn update_plan_price(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpdatePlanPriceRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if input.price <= 0 {
        return Err(AppError::Core(CoreError::Validation("Invalid price".into())));
    }

    let key = match &input.plan {
        Some(plan) => plan.parse::<Plan>().map_err(AppError::Core)?.price_key(),
        None => PLAN_PRICE_KEY,
    };

    let setting = state
        .settings
        .put(&state.pool, key, &input.price.to_string())
        .await?;

    tracing::info!(key = %setting.key, price = input.price, "Plan price updated");
    Ok(Json(serde_json::json!({
        "key": setting.key,
        "price": input.price,
    })))
}
