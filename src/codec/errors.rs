//! Codec errors
//!
//! Encoding is deliberately lenient: malformed input degrades to a skip, not
//! an error. The only hard failure is password hashing.

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised by the value codec
#[derive(Debug, Clone, Error)]
pub enum CodecError {
    /// Argon2 hashing failed; the write must abort rather than store
    /// plaintext or an empty hash
    #[error("password hashing failed: {0}")]
    HashFailure(String),
}
