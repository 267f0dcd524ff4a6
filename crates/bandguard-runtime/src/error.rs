//! Runtime error types

use bandguard_core::RequestDataError;
use thiserror::Error;

/// Runtime error
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Request lacks data needed to build the history query
    #[error(transparent)]
    RequestData(#[from] RequestDataError),

    /// Unsuccessful transaction with no matching exit condition
    #[error("{0}")]
    BusinessRule(String),

    /// History count missing or unusable
    #[error(transparent)]
    DataRetrieval(#[from] DataRetrievalError),

    /// Failure surfaced by the history store, passed through unchanged
    #[error(transparent)]
    Store(anyhow::Error),
}

/// History count could not be used
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataRetrievalError {
    #[error("Data error: irretrievable transaction history")]
    Irretrievable,

    #[error("Data error: query result type mismatch - expected a number")]
    TypeMismatch,

    #[error("Value provided undefined, so cannot determine rule outcome")]
    UndefinedValue,
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
