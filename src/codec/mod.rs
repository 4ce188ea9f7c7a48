//! Value codec subsystem for versocms
//!
//! Pure mapping between a field's declared type (plus options) and the
//! physical columns used to store one scalar or structured value.
//!
//! # Contract
//!
//! 1. `column_for(type, options)` selects the column family
//! 2. `encode(field, raw, resolver)` yields an explicit skip/write decision
//! 3. `decode(field, columns)` restores the caller-facing JSON shape
//!
//! # Invariants
//!
//! - Exactly one column family per row, except richtext (text + json)
//! - Passwords store an Argon2id hash, never plaintext
//! - Media/relation values store resolved numeric id lists only

mod column;
mod decode;
mod encode;
mod errors;
mod resolve;
mod value;

pub use column::{column_for, ColumnFamily, CoreColumn, ValueColumns};
pub use decode::decode;
pub use encode::{encode, parse_datetime, parse_naive_date, parse_number, truthy, RANGE_DELIMITER};
pub use errors::{CodecError, CodecResult};
pub use resolve::{AssetLookup, EntryLookup, IdResolver};
pub use value::{Value, WriteDecision};
