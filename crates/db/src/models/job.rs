//! Job entity model and DTOs.

use pureflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub user_id: DbId,
    pub technician_id: Option<DbId>,
    pub job_type: String,
    pub status: String,
    pub scheduled_for: Timestamp,
    pub scheduled_end_time: Timestamp,
    pub notes: Option<String>,
    pub address: String,
    pub address_lat: Option<f64>,
    pub address_lng: Option<f64>,
    pub photo_proof: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a job. Status always starts as `scheduled`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJob {
    pub user_id: DbId,
    pub technician_id: Option<DbId>,
    pub job_type: String,
    pub scheduled_for: Timestamp,
    pub scheduled_end_time: Timestamp,
    pub notes: Option<String>,
    pub address: String,
    pub address_lat: Option<f64>,
    pub address_lng: Option<f64>,
}

/// Admin listing filters. All fields optional; `date` matches the calendar
/// day of `scheduled_for`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFilters {
    pub status: Option<String>,
    pub date: Option<chrono::NaiveDate>,
    pub technician_id: Option<DbId>,
    pub job_type: Option<String>,
}
