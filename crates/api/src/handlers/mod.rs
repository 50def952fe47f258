//! HTTP handlers, one module per resource.

pub mod auth;
pub mod job;
pub mod notification;
pub mod onboarding;
pub mod payment;
pub mod settings;
pub mod staff;
pub mod stripe;
pub mod subscription;
