//! Schema registry errors

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while registering collection schemas.
///
/// These guard structural invariants only; document validation lives in the
/// external validation layer.
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    /// A non-group field declared child fields
    #[error("field '{0}' is not a group but declares children")]
    ChildrenOnNonGroup(String),

    /// A group field nested another group
    #[error("group field '{0}' contains nested group '{1}'")]
    NestedGroup(String, String),

    /// Duplicate field name within one scope
    #[error("duplicate field name '{0}' in collection '{1}'")]
    DuplicateField(String, String),

    /// A relation field is missing its target collection
    #[error("relation field '{0}' has no target collection")]
    MissingRelationTarget(String),

    /// Collection registered twice
    #[error("collection id {0} is already registered")]
    DuplicateCollection(i64),
}
