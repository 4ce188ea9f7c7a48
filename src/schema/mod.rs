//! Schema subsystem for versocms
//!
//! Collections own ordered field definitions; fields carry a closed declared
//! type plus options (repeatable, multiple, date mode, relation target,
//! enumeration values, group children). The registry is read-only to the
//! rest of the core.
//!
//! # Invariants
//!
//! - Only group fields own children
//! - Children are never themselves groups
//! - Field names are unique within their scope

mod errors;
mod registry;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use registry::SchemaRegistry;
pub use types::{
    Collection, CollectionId, DateMode, FieldDefinition, FieldId, FieldOptions, FieldType,
    ProjectId, ValidationRules,
};
