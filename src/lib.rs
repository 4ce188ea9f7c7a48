//! versocms - headless content-management core
//!
//! Schema-flexible value storage and query compilation: user-defined field
//! schemas persisted through a fixed set of physical columns, filtered and
//! sorted through a nested query-parameter DSL.

pub mod codec;
pub mod filter;
pub mod observability;
pub mod query;
pub mod schema;
pub mod sort;
pub mod store;
