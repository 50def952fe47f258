//! Payment entity model and DTOs.

use pureflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub user_id: DbId,
    pub subscription_id: Option<DbId>,
    pub amount: i64,
    pub status: String,
    pub method: String,
    pub transaction_id: String,
    pub card_last4: Option<String>,
    pub card_type: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a payment attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePayment {
    pub user_id: DbId,
    pub subscription_id: Option<DbId>,
    pub amount: i64,
    pub status: String,
    pub method: String,
    pub transaction_id: String,
}

/// DTO for patching a payment (status flip, card display fields).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePayment {
    pub status: Option<String>,
    pub card_last4: Option<String>,
    pub card_type: Option<String>,
}

/// Admin listing filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentFilters {
    pub status: Option<String>,
    pub method: Option<String>,
    pub from_date: Option<Timestamp>,
    pub to_date: Option<Timestamp>,
}
