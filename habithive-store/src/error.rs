//! Record store error types.

use thiserror::Error;

/// Result type for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported at the record store boundary.
///
/// All failure in the system originates here; the streak engine itself
/// never fails.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("subscription closed")]
    SubscriptionClosed,
}
