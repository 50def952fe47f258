use crate::types::DbId;

/// Domain-level error taxonomy.
///
/// The API layer maps each variant onto an HTTP status: validation failures
/// become 400, missing entities 404, conflicts 409, and so on. Downstream
/// covers failures talking to the payment gateway.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Payment gateway error: {0}")]
    Downstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
