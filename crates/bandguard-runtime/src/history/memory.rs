//! In-memory history store
//!
//! Simple memory-based transaction history for testing and development.

use super::{account_key, HistoryQuery, HistoryRows, HistoryStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::RwLock;

/// Historical transaction as recorded in the store
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEvent {
    /// Namespaced debtor account key
    pub account_key: String,
    pub tx_tp: String,
    pub tenant_id: Option<String>,
    pub cre_dt_tm: DateTime<Utc>,
}

impl HistoryEvent {
    /// Create an event for a raw (not yet namespaced) debtor account id
    pub fn new(dbtr_acct_id: &str, tx_tp: impl Into<String>, cre_dt_tm: DateTime<Utc>) -> Self {
        Self {
            account_key: account_key(dbtr_acct_id),
            tx_tp: tx_tp.into(),
            tenant_id: None,
            cre_dt_tm,
        }
    }

    /// Set the owning tenant
    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    fn matches(&self, query: &HistoryQuery) -> bool {
        if self.account_key != query.account_key || self.tx_tp != query.tx_tp {
            return false;
        }
        if let Some(ref tenant_id) = query.tenant_id {
            if self.tenant_id.as_ref() != Some(tenant_id) {
                return false;
            }
        }
        query.window.contains(&self.cre_dt_tm)
    }
}

/// In-memory history store
///
/// Data is lost when the process exits.
pub struct InMemoryHistoryStore {
    events: RwLock<Vec<HistoryEvent>>,
}

impl InMemoryHistoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }

    /// Create a store holding `events`
    pub fn with_events(events: Vec<HistoryEvent>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }

    /// Record an event
    pub async fn add_event(&self, event: HistoryEvent) {
        self.events.write().await.push(event);
    }

    /// Record several events
    pub async fn add_events(&self, events: Vec<HistoryEvent>) {
        self.events.write().await.extend(events);
    }

    /// Number of recorded events
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn query_history(&self, query: &HistoryQuery) -> anyhow::Result<Option<HistoryRows>> {
        let events = self.events.read().await;
        let count = events.iter().filter(|event| event.matches(query)).count();

        Ok(Some(vec![vec![json!(count)]]))
    }
}
