//! Query and write-path errors

use thiserror::Error;

use crate::codec::CodecError;
use crate::store::StoreError;

/// Result type for executor and writer operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised by the query executor and write path.
///
/// Schema/filter mismatches never land here: unrecognized filter and sort
/// clauses drop fail-open. These variants cover genuinely unservable
/// requests.
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// Scope names a collection the registry does not know
    #[error("collection {0} not found")]
    CollectionNotFound(i64),

    /// Single-entry lookup missed within the scope
    #[error("entry '{0}' not found")]
    EntryNotFound(String),

    /// Value encoding failed (password hashing)
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Store-level failure
    #[error(transparent)]
    Store(#[from] StoreError),
}
