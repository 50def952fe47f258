//! In-process cache over the `settings` table.
//!
//! Plan prices are read on nearly every subscription and payment request but
//! change only when an admin updates them, so each key is fetched from the
//! database once and then served from memory. Writes go through [`put`],
//! which updates the database first and then the cached entry, so a process
//! never serves a price older than its own last write.
//!
//! [`put`]: SettingsCache::put

use std::collections::HashMap;
use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::RwLock;

use pureflow_db::models::setting::Setting;
use pureflow_db::repositories::SettingRepo;

/// Cheaply cloneable read-through settings cache.
#[derive(Clone, Default)]
pub struct SettingsCache {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl SettingsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a setting value, reading through to the database on a cache miss.
    ///
    /// Returns `None` when the key exists in neither the cache nor the
    /// database.
    pub async fn get(&self, pool: &PgPool, key: &str) -> Result<Option<String>, sqlx::Error> {
        if let Some(value) = self.entries.read().await.get(key) {
            return Ok(Some(value.clone()));
        }

        let value = SettingRepo::get(pool, key).await?;
        if let Some(value) = &value {
            self.entries
                .write()
                .await
                .insert(key.to_string(), value.clone());
        }
        Ok(value)
    }

    /// Get a setting as an integer, falling back to `default` when the key
    /// is absent or the stored value does not parse.
    pub async fn get_int(
        &self,
        pool: &PgPool,
        key: &str,
        default: i64,
    ) -> Result<i64, sqlx::Error> {
        let value = self.get(pool, key).await?;
        Ok(value.and_then(|v| v.parse().ok()).unwrap_or(default))
    }

    /// Write a setting to the database and refresh the cached entry.
    pub async fn put(&self, pool: &PgPool, key: &str, value: &str) -> Result<Setting, sqlx::Error> {
        let setting = SettingRepo::upsert(pool, key, value).await?;
        self.entries
            .write()
            .await
            .insert(setting.key.clone(), setting.value.clone());
        Ok(setting)
    }
}
