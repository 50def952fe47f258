//! PureFlow domain layer.
//!
//! Framework-free types shared by the persistence gateway and the HTTP API:
//! entity status machines, the plan catalogue, role constants, and the
//! capability check used for authorization decisions.

pub mod error;
pub mod job;
pub mod onboarding;
pub mod payment;
pub mod permissions;
pub mod plans;
pub mod roles;
pub mod subscription;
pub mod types;
