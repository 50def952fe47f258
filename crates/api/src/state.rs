use std::sync::Arc;

use crate::config::ServerConfig;
use crate::settings::SettingsCache;
use crate::stripe::client::StripeClient;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: pureflow_db::DbPool,
    /// Server configuration (JWT secret, Stripe keys, timeouts).
    pub config: Arc<ServerConfig>,
    /// Read-through cache over the `settings` table (plan prices).
    pub settings: SettingsCache,
    /// Stripe API client. `None` when no secret key is configured, in which
    /// case the card-payment endpoints answer with a gateway error.
    pub stripe: Option<Arc<StripeClient>>,
}
