//! Job types and the job status machine.
//!
//! A job is a single scheduled service visit. Its status advances
//! monotonically: once a job is completed or cancelled it never moves again,
//! and a technician cannot rewind an in-progress visit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Kind of service visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Installation,
    FilterChange,
    Repair,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Installation => "installation",
            JobType::FilterChange => "filter_change",
            JobType::Repair => "repair",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "installation" => Ok(JobType::Installation),
            "filter_change" => Ok(JobType::FilterChange),
            "repair" => Ok(JobType::Repair),
            other => Err(CoreError::Validation(format!(
                "Invalid job type '{other}'. Must be one of: installation, filter_change, repair"
            ))),
        }
    }
}

/// Progress of a service visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Scheduled,
    EnRoute,
    Arrived,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Scheduled => "scheduled",
            JobStatus::EnRoute => "en_route",
            JobStatus::Arrived => "arrived",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal statuses accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }

    /// Allowed transitions out of each status.
    ///
    /// A visit may be completed straight from `scheduled` (the technician
    /// forgot to report en-route/arrived), but never resurrected from a
    /// terminal status. Same-status writes carry no meaning and are rejected.
    pub fn can_transition_to(&self, target: JobStatus) -> bool {
        use JobStatus::*;
        match (self, target) {
            (Scheduled, EnRoute | Arrived | Completed | Cancelled) => true,
            (EnRoute, Arrived | Cancelled) => true,
            (Arrived, Completed | Cancelled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(JobStatus::Scheduled),
            "en_route" => Ok(JobStatus::EnRoute),
            "arrived" => Ok(JobStatus::Arrived),
            "completed" => Ok(JobStatus::Completed),
            "cancelled" => Ok(JobStatus::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Invalid job status '{other}'. Must be one of: scheduled, en_route, arrived, completed, cancelled"
            ))),
        }
    }
}
