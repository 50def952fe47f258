//! PureFlow API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, the
//! Stripe gateway client) so integration tests and the binary entrypoint can
//! both access them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notify;
pub mod routes;
pub mod settings;
pub mod state;
pub mod stripe;
