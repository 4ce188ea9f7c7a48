//! Filter subsystem for versocms
//!
//! Translates the nested caller-facing filter object into a constraint tree
//! executable against the content store.
//!
//! # Pipeline
//!
//! 1. `parse_filter` turns the JSON query shape into a `FilterTree`
//! 2. `compile` classifies each key (core column, custom field, relation
//!    chain, or-group) against one collection's schema
//! 3. `ConstraintSet::matches` evaluates one entry
//!
//! # Invariants
//!
//! - Fail-open: unknown fields and operators drop, queries never fail on
//!   schema drift; dropped keys surface as diagnostics
//! - `not` is negated existence, not `!=`
//! - Relation/media null-ness accounts for rows owning zero links

mod ast;
mod compiler;
mod constraint;
mod operators;

pub use ast::{parse_filter, FilterNode, FilterOp, FilterTree};
pub use compiler::{compile, CompiledFilter};
pub use constraint::{Constraint, ConstraintSet};
pub use operators::like_match;
