//! Stripe gateway integration: REST client and webhook verification.

pub mod client;
pub mod webhook;
