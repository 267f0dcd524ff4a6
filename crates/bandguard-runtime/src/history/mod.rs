//! Transaction history layer
//!
//! Provides the async contract for counting prior transactions of a debtor
//! account, the query it receives, and reference store implementations.

mod memory;
mod query;

#[cfg(feature = "sqlx")]
mod postgres;

pub use memory::{HistoryEvent, InMemoryHistoryStore};
pub use query::{account_key, HistoryQuery, HistoryQueryBuilder, QueryWindow, ACCOUNT_NAMESPACE};

#[cfg(feature = "sqlx")]
pub use postgres::PostgresHistoryStore;

use crate::error::DataRetrievalError;
use async_trait::async_trait;
use serde_json::Value;

/// Result batches returned by a history query; the count sits at `[0][0]`
pub type HistoryRows = Vec<Vec<Value>>;

/// Async store for counting historical transactions
///
/// `Ok(None)` means the store produced no result at all. Errors are
/// propagated to the caller unchanged.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Run a bounded time-window count query
    async fn query_history(&self, query: &HistoryQuery) -> anyhow::Result<Option<HistoryRows>>;
}

/// Extract the transaction count from query rows
///
/// A missing result, empty batches or `null` are irretrievable; anything that
/// is not a non-negative whole number is a type mismatch. Zero is a valid
/// count.
pub fn read_count(rows: Option<HistoryRows>) -> Result<u64, DataRetrievalError> {
    let value = rows
        .as_ref()
        .and_then(|batches| batches.first())
        .and_then(|batch| batch.first())
        .ok_or(DataRetrievalError::Irretrievable)?;

    match value {
        Value::Null => Err(DataRetrievalError::Irretrievable),
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
            .ok_or(DataRetrievalError::TypeMismatch),
        _ => Err(DataRetrievalError::TypeMismatch),
    }
}
