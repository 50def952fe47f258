//! Subscription plan catalogue.
//!
//! Prices live in the `settings` table so admins can change them at runtime;
//! the constants here are the setting keys and the fallback values used when
//! a key has never been written.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Setting key for the price applied to newly created subscriptions.
pub const PLAN_PRICE_KEY: &str = "plan_price";

/// Fallback price for new subscriptions when no setting exists.
pub const DEFAULT_PLAN_PRICE: i64 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    Basic,
    Premium,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Basic => "basic",
            Plan::Premium => "premium",
        }
    }

    /// Setting key holding this plan's monthly price.
    pub fn price_key(&self) -> &'static str {
        match self {
            Plan::Basic => "basic_plan_price",
            Plan::Premium => "premium_plan_price",
        }
    }

    /// Price used when the setting has never been written.
    pub fn default_price(&self) -> i64 {
        match self {
            Plan::Basic => 25,
            Plan::Premium => 35,
        }
    }

    /// Capitalized name for customer-facing notification text.
    pub fn display_name(&self) -> &'static str {
        match self {
            Plan::Basic => "Basic",
            Plan::Premium => "Premium",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Plan::Basic),
            "premium" => Ok(Plan::Premium),
            other => Err(CoreError::Validation(format!(
                "Invalid plan '{other}'. Must be one of: basic, premium"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_parsing() {
        assert_eq!("basic".parse::<Plan>().unwrap(), Plan::Basic);
        assert_eq!("premium".parse::<Plan>().unwrap(), Plan::Premium);
        assert!("gold".parse::<Plan>().is_err());
    }

    #[test]
    fn test_default_prices() {
        assert_eq!(Plan::Basic.default_price(), 25);
        assert_eq!(Plan::Premium.default_price(), 35);
    }

    #[test]
    fn test_price_keys_are_distinct() {
        assert_ne!(Plan::Basic.price_key(), Plan::Premium.price_key());
        assert_ne!(Plan::Basic.price_key(), PLAN_PRICE_KEY);
    }
}
