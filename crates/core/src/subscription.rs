//! Subscription status machine and billing period helpers.
//!
//! A subscription starts `pending` and becomes `active` on the first
//! successful payment. From `active` it can be paused, cancelled, or knocked
//! into `payment_failed` by the gateway; an explicit reactivation returns it
//! to `active`.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Utc};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Length of one billing period. Applied on every activation.
pub const BILLING_PERIOD_DAYS: i64 = 30;

/// The next payment date for a subscription activated now.
pub fn next_payment_date() -> Timestamp {
    Utc::now() + Duration::days(BILLING_PERIOD_DAYS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Pending,
    Active,
    Paused,
    Cancelled,
    PaymentFailed,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Paused => "paused",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::PaymentFailed => "payment_failed",
        }
    }

    /// Allowed transitions out of each status.
    ///
    /// `cancelled` is not fully terminal: a customer may reactivate a
    /// cancelled subscription, which resumes billing.
    pub fn can_transition_to(&self, target: SubscriptionStatus) -> bool {
        use SubscriptionStatus::*;
        match (self, target) {
            (Pending, Active | Cancelled | PaymentFailed) => true,
            (Active, Paused | Cancelled | PaymentFailed) => true,
            (Paused, Active | Cancelled) => true,
            (Cancelled, Active) => true,
            (PaymentFailed, Active | Cancelled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SubscriptionStatus::Pending),
            "active" => Ok(SubscriptionStatus::Active),
            "paused" => Ok(SubscriptionStatus::Paused),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            "payment_failed" => Ok(SubscriptionStatus::PaymentFailed),
            other => Err(CoreError::Validation(format!(
                "Invalid subscription status '{other}'. Must be one of: pending, active, paused, cancelled, payment_failed"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_paths() {
        assert!(SubscriptionStatus::Pending.can_transition_to(SubscriptionStatus::Active));
        assert!(SubscriptionStatus::Paused.can_transition_to(SubscriptionStatus::Active));
        assert!(SubscriptionStatus::Cancelled.can_transition_to(SubscriptionStatus::Active));
        assert!(SubscriptionStatus::PaymentFailed.can_transition_to(SubscriptionStatus::Active));
    }

    #[test]
    fn test_pause_only_from_active() {
        assert!(SubscriptionStatus::Active.can_transition_to(SubscriptionStatus::Paused));
        assert!(!SubscriptionStatus::Pending.can_transition_to(SubscriptionStatus::Paused));
        assert!(!SubscriptionStatus::Cancelled.can_transition_to(SubscriptionStatus::Paused));
    }

    #[test]
    fn test_payment_failure_paths() {
        assert!(SubscriptionStatus::Pending.can_transition_to(SubscriptionStatus::PaymentFailed));
        assert!(SubscriptionStatus::Active.can_transition_to(SubscriptionStatus::PaymentFailed));
        assert!(!SubscriptionStatus::Paused.can_transition_to(SubscriptionStatus::PaymentFailed));
    }

    #[test]
    fn test_cannot_return_to_pending() {
        for from in [
            SubscriptionStatus::Active,
            SubscriptionStatus::Paused,
            SubscriptionStatus::Cancelled,
            SubscriptionStatus::PaymentFailed,
        ] {
            assert!(!from.can_transition_to(SubscriptionStatus::Pending));
        }
    }

    #[test]
    fn test_next_payment_date_is_one_period_out() {
        let next = next_payment_date();
        let delta = next - Utc::now();
        assert_eq!(delta.num_days(), BILLING_PERIOD_DAYS - 1); // just under 30 full days
    }
}
