//! Notification entity model and DTOs.

use pureflow_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// One pending notification in a fan-out batch.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: DbId,
    pub title: String,
    pub message: String,
}

impl NewNotification {
    pub fn new(user_id: DbId, title: impl Into<String>, message: impl Into<String>) -> Self {
        NewNotification {
            user_id,
            title: title.into(),
            message: message.into(),
        }
    }
}
