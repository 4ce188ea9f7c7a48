//! Store errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the content store
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Entry id does not exist or was hard-deleted
    #[error("entry {0} not found")]
    EntryNotFound(i64),
}
