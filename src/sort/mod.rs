//! Sort subsystem for versocms
//!
//! Resolves a requested sort spec into core-column or value-column ordering
//! keys with explicit null-last placement, then applies the plan to
//! materialized entries with a stable multi-key sort.

mod planner;

pub use planner::{
    plan, sort_entries, SortColumn, SortDirection, SortKey, SortPlan, SortTarget,
};
