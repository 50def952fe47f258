//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `users.role` in the initial
//! migration.

pub const ROLE_CUSTOMER: &str = "customer";
pub const ROLE_TECHNICIAN: &str = "technician";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role names, in seniority order.
pub const VALID_ROLES: &[&str] = &[ROLE_CUSTOMER, ROLE_TECHNICIAN, ROLE_ADMIN];
