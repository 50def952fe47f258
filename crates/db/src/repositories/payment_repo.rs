//! Repository for the `payments` table.

use pureflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::payment::{CreatePayment, Payment, PaymentFilters, UpdatePayment};

/// Column list for `payments` queries.
const COLUMNS: &str = "id, user_id, subscription_id, amount, status, method, transaction_id, \
                       card_last4, card_type, created_at, updated_at";

/// Provides CRUD operations for payments.
pub struct PaymentRepo;

impl PaymentRepo {
    /// Record a payment attempt. Transaction identity is immutable once
    /// created; only status and card display fields change afterwards.
    pub async fn create(pool: &PgPool, input: &CreatePayment) -> Result<Payment, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments (user_id, subscription_id, amount, status, method, transaction_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(input.user_id)
            .bind(input.subscription_id)
            .bind(input.amount)
            .bind(&input.status)
            .bind(&input.method)
            .bind(&input.transaction_id)
            .fetch_one(pool)
            .await
    }

    /// Find a payment by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments WHERE id = $1");
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Merge-patch a payment. Returns `None` if no row exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePayment,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!(
            "UPDATE payments SET
                status = COALESCE($2, status),
                card_last4 = COALESCE($3, card_last4),
                card_type = COALESCE($4, card_type),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(&input.card_last4)
            .bind(&input.card_type)
            .fetch_optional(pool)
            .await
    }

    /// List a customer's payments, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Payment>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM payments WHERE user_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Payment>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List all payments with the admin report filters applied.
    pub async fn list_all(
        pool: &PgPool,
        filters: &PaymentFilters,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::text IS NULL OR method = $2)
               AND ($3::timestamptz IS NULL OR created_at >= $3)
               AND ($4::timestamptz IS NULL OR created_at <= $4)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(&filters.status)
            .bind(&filters.method)
            .bind(filters.from_date)
            .bind(filters.to_date)
            .fetch_all(pool)
            .await
    }
}
