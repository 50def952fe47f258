//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod job;
pub mod notification;
pub mod onboarding;
pub mod payment;
pub mod setting;
pub mod subscription;
pub mod user;
