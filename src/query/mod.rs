//! Query subsystem for versocms
//!
//! The executor composes base scope (project + collection + lifecycle
//! view), compiled filter, sort plan, and size controls into one read. The
//! writer is the matching atomic write path: create, full replace, partial
//! replace, and destroy, fanning out through the codec, the group instance
//! manager, and the link stores.
//!
//! # Invariants
//!
//! - Page-based pagination overrides limit/offset; count short-circuits
//! - Singleton collections return at most one entry regardless of filters
//! - One write = one exclusive borrow = one atomic unit

mod errors;
mod executor;
mod result;
mod scope;
mod writer;

pub use errors::{QueryError, QueryResult};
pub use executor::{
    ContentQuery, ListOutcome, ListRequest, ListResult, PageRequest, QueryLimits, DEFAULT_LIMIT,
    MAX_LIMIT,
};
pub use result::EntryDocument;
pub use scope::{LifecycleView, QueryScope};
pub use writer::ContentWriter;
