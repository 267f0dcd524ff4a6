//! Bandguard Runtime - Evaluation steps for the Bandguard rule engine
//!
//! This crate provides the steps the rule evaluator runs after the
//! configuration has been validated:
//! - Exit-condition short-circuiting for unsuccessful transactions
//! - History query construction and the history store contract
//! - Count-to-band classification
//! - Structured rule logging

pub mod classify;
pub mod error;
pub mod exit;
pub mod history;
pub mod observability;

// Re-export main types
pub use classify::classify;
pub use error::{DataRetrievalError, Result, RuntimeError};
pub use exit::{evaluate_exit_conditions, ExitOutcome, UNSUCCESSFUL_NO_EXIT_CONDITION};
pub use history::{
    account_key, read_count, HistoryEvent, HistoryQuery, HistoryQueryBuilder, HistoryRows,
    HistoryStore, InMemoryHistoryStore, QueryWindow, ACCOUNT_NAMESPACE,
};
pub use observability::RuleLogger;

#[cfg(feature = "sqlx")]
pub use history::PostgresHistoryStore;
