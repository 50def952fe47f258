//! Onboarding state model and DTOs.

use pureflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `onboarding_state` table, one per customer.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OnboardingState {
    pub id: DbId,
    pub user_id: DbId,
    pub step: String,
    pub plan_selected: bool,
    pub terms_accepted: bool,
    pub address_entered: bool,
    pub installation_scheduled: bool,
    pub payment_completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Merge-patch for the onboarding row. Absent fields keep their value;
/// the upsert inserts defaults first if the customer has no row yet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OnboardingPatch {
    pub step: Option<String>,
    pub plan_selected: Option<bool>,
    pub terms_accepted: Option<bool>,
    pub address_entered: Option<bool>,
    pub installation_scheduled: Option<bool>,
    pub payment_completed: Option<bool>,
}
