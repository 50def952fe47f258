//! User entity model and DTOs.

use pureflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub city: Option<String>,
    pub address: Option<String>,
    pub address_lat: Option<f64>,
    pub address_lng: Option<f64>,
    pub created_at: Timestamp,
    pub last_login_at: Option<Timestamp>,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub role: String,
    pub city: Option<String>,
    pub address: Option<String>,
    pub address_lat: Option<f64>,
    pub address_lng: Option<f64>,
    pub created_at: Timestamp,
    pub last_login_at: Option<Timestamp>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            phone: user.phone,
            username: user.username,
            role: user.role,
            city: user.city,
            address: user.address,
            address_lat: user.address_lat,
            address_lng: user.address_lng,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// DTO for creating a new user (registration or staff creation).
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub phone: String,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

/// DTO for the address captured during onboarding.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveAddress {
    pub address: String,
    pub city: String,
    pub lat: f64,
    pub lng: f64,
}
