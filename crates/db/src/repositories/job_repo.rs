//! Repository for the `jobs` table.

use pureflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::job::{CreateJob, Job, JobFilters};

/// Column list for `jobs` queries.
const COLUMNS: &str = "id, user_id, technician_id, job_type, status, scheduled_for, \
                       scheduled_end_time, notes, address, address_lat, address_lng, \
                       photo_proof, created_at, updated_at";

/// Provides CRUD operations for jobs.
pub struct JobRepo;

impl JobRepo {
    /// Insert a new job. Status always starts as `scheduled` with no proof
    /// photo, whatever the caller supplies.
    pub async fn create(pool: &PgPool, input: &CreateJob) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs (user_id, technician_id, job_type, scheduled_for,
                               scheduled_end_time, notes, address, address_lat, address_lng)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(input.user_id)
            .bind(input.technician_id)
            .bind(&input.job_type)
            .bind(input.scheduled_for)
            .bind(input.scheduled_end_time)
            .bind(&input.notes)
            .bind(&input.address)
            .bind(input.address_lat)
            .bind(input.address_lng)
            .fetch_one(pool)
            .await
    }

    /// Find a job by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a customer's jobs, soonest visit first.
    pub async fn list_for_customer(pool: &PgPool, user_id: DbId) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE user_id = $1 ORDER BY scheduled_for");
        sqlx::query_as::<_, Job>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List a technician's assigned jobs, soonest visit first.
    pub async fn list_for_technician(
        pool: &PgPool,
        technician_id: DbId,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM jobs WHERE technician_id = $1 ORDER BY scheduled_for");
        sqlx::query_as::<_, Job>(&query)
            .bind(technician_id)
            .fetch_all(pool)
            .await
    }

    /// List all jobs with the admin dashboard filters applied.
    ///
    /// `date` matches the calendar day of `scheduled_for` in UTC. Absent
    /// filters are passed as NULL and skipped by the guard expressions.
    pub async fn list_all(pool: &PgPool, filters: &JobFilters) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::date IS NULL OR scheduled_for::date = $2)
               AND ($3::bigint IS NULL OR technician_id = $3)
               AND ($4::text IS NULL OR job_type = $4)
             ORDER BY scheduled_for"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(&filters.status)
            .bind(filters.date)
            .bind(filters.technician_id)
            .bind(&filters.job_type)
            .fetch_all(pool)
            .await
    }

    /// Set a job's status and optionally attach a proof photo.
    ///
    /// Returns `None` if no row with the given `id` exists. Transition
    /// legality is checked by the caller against the current row.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        photo_proof: Option<&str>,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "UPDATE jobs SET
                status = $2,
                photo_proof = COALESCE($3, photo_proof),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(status)
            .bind(photo_proof)
            .fetch_optional(pool)
            .await
    }

    /// Assign a technician to a job.
    ///
    /// Returns `None` if no row with the given `id` exists. The caller
    /// validates that the target user holds the technician role.
    pub async fn assign_technician(
        pool: &PgPool,
        id: DbId,
        technician_id: DbId,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "UPDATE jobs SET technician_id = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(technician_id)
            .fetch_optional(pool)
            .await
    }
}
