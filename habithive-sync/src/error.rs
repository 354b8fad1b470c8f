//! Sync controller error types.

use habithive_store::StoreError;
use thiserror::Error;

/// Result type for sync controller operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors surfaced by the sync controller.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Rejected before any store call is made.
    #[error("habit name cannot be empty")]
    EmptyHabitName,

    #[error("sync controller not running")]
    ChannelClosed,

    #[error(transparent)]
    Store(#[from] StoreError),
}
