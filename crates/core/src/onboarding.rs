//! Customer onboarding step machine.
//!
//! A new customer moves linearly through account -> plan -> address ->
//! payment -> complete. The step field drives client-side routing only; the
//! per-milestone boolean flags on the onboarding row are informational.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The five onboarding steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    Account,
    Plan,
    Address,
    Payment,
    Complete,
}

impl OnboardingStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnboardingStep::Account => "account",
            OnboardingStep::Plan => "plan",
            OnboardingStep::Address => "address",
            OnboardingStep::Payment => "payment",
            OnboardingStep::Complete => "complete",
        }
    }

    /// Position in the linear flow, 0-based.
    fn rank(&self) -> u8 {
        match self {
            OnboardingStep::Account => 0,
            OnboardingStep::Plan => 1,
            OnboardingStep::Address => 2,
            OnboardingStep::Payment => 3,
            OnboardingStep::Complete => 4,
        }
    }

    /// Whether the step may be set to `target`.
    ///
    /// Onboarding is one-directional: forward moves and same-step rewrites
    /// (idempotent client retries) are allowed, regressions are not.
    pub fn can_advance_to(&self, target: OnboardingStep) -> bool {
        target.rank() >= self.rank()
    }
}

impl fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OnboardingStep {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "account" => Ok(OnboardingStep::Account),
            "plan" => Ok(OnboardingStep::Plan),
            "address" => Ok(OnboardingStep::Address),
            "payment" => Ok(OnboardingStep::Payment),
            "complete" => Ok(OnboardingStep::Complete),
            other => Err(CoreError::Validation(format!(
                "Invalid onboarding step '{other}'. Must be one of: account, plan, address, payment, complete"
            ))),
        }
    }
}
