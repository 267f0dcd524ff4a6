//! Observability support
//!
//! Structured logging for rule evaluation, emitted through `tracing`.

pub mod logger;

pub use logger::RuleLogger;
