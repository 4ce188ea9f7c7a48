//! Observability for versocms
//!
//! Structured synchronous JSON logging with deterministic key ordering.
//! Write-path and executor operations emit one event per operation.

mod logger;

pub use logger::{Logger, Severity};
