//! Repository for the `onboarding_state` table.

use pureflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::onboarding::{OnboardingPatch, OnboardingState};

/// Column list for `onboarding_state` queries.
const COLUMNS: &str = "id, user_id, step, plan_selected, terms_accepted, address_entered, \
                       installation_scheduled, payment_completed, created_at, updated_at";

/// Provides access to each customer's onboarding row.
pub struct OnboardingRepo;

impl OnboardingRepo {
    /// Find a customer's onboarding state, if any.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<OnboardingState>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM onboarding_state WHERE user_id = $1");
        sqlx::query_as::<_, OnboardingState>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Merge `patch` into the customer's onboarding row, creating the row
    /// with defaults first if none exists.
    ///
    /// A single upsert keyed on `uq_onboarding_state_user_id`, so two
    /// concurrent first writes cannot produce duplicate rows. Absent patch
    /// fields keep their stored value (or the column default on insert).
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        patch: &OnboardingPatch,
    ) -> Result<OnboardingState, sqlx::Error> {
        let query = format!(
            "INSERT INTO onboarding_state
                (user_id, step, plan_selected, terms_accepted, address_entered,
                 installation_scheduled, payment_completed)
             VALUES ($1, COALESCE($2, 'account'), COALESCE($3, false), COALESCE($4, false),
                     COALESCE($5, false), COALESCE($6, false), COALESCE($7, false))
             ON CONFLICT (user_id) DO UPDATE SET
                step = COALESCE($2, onboarding_state.step),
                plan_selected = COALESCE($3, onboarding_state.plan_selected),
                terms_accepted = COALESCE($4, onboarding_state.terms_accepted),
                address_entered = COALESCE($5, onboarding_state.address_entered),
                installation_scheduled = COALESCE($6, onboarding_state.installation_scheduled),
                payment_completed = COALESCE($7, onboarding_state.payment_completed),
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OnboardingState>(&query)
            .bind(user_id)
            .bind(&patch.step)
            .bind(patch.plan_selected)
            .bind(patch.terms_accepted)
            .bind(patch.address_entered)
            .bind(patch.installation_scheduled)
            .bind(patch.payment_completed)
            .fetch_one(pool)
            .await
    }
}
