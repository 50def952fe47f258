//! Notification fan-out helpers.
//!
//! Every lifecycle event that notifies the acting customer plus the admin
//! team funnels through here. The whole recipient set is written in one
//! batch insert so a crash mid-request cannot leave some admins informed
//! and others not.

use sqlx::PgPool;

use pureflow_core::types::DbId;
use pureflow_db::models::notification::NewNotification;
use pureflow_db::repositories::{NotificationRepo, UserRepo};

/// Notify a single user.
pub async fn notify_user(
    pool: &PgPool,
    user_id: DbId,
    title: &str,
    message: &str,
) -> Result<(), sqlx::Error> {
    let batch = [NewNotification::new(user_id, title, message)];
    NotificationRepo::create_batch(pool, &batch).await?;
    Ok(())
}

/// Notify a customer and every admin in one batch.
///
/// The customer gets `(title, message)`; each admin gets
/// `(admin_title, admin_message)`.
pub async fn notify_user_and_admins(
    pool: &PgPool,
    user_id: DbId,
    title: &str,
    message: &str,
    admin_title: &str,
    admin_message: &str,
) -> Result<(), sqlx::Error> {
    let mut batch = vec![NewNotification::new(user_id, title, message)];
    for admin in UserRepo::list_by_role(pool, pureflow_core::roles::ROLE_ADMIN).await? {
        batch.push(NewNotification::new(admin.id, admin_title, admin_message));
    }
    NotificationRepo::create_batch(pool, &batch).await?;
    Ok(())
}
