//! In-memory configuration store
//!
//! Simple memory-based store for testing and development. It counts the
//! queries and writes it serves and can be told to fail, which makes cache
//! behaviour observable in tests.

use async_trait::async_trait;
use bandguard_core::TenantRuleConfig;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::traits::{ConfigBatches, ConfigStore};
use crate::{RepositoryError, RepositoryResult};

/// In-memory configuration store
pub struct MemoryConfigStore {
    /// Map of (tenant_id, rule_id) -> configuration
    configs: RwLock<HashMap<(String, String), TenantRuleConfig>>,
    queries: AtomicUsize,
    writes: AtomicUsize,
    fail_queries: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryConfigStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            configs: RwLock::new(HashMap::new()),
            queries: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            fail_queries: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Create a store preloaded with configurations
    pub fn with_configs(configs: Vec<TenantRuleConfig>) -> Self {
        let mut store = Self::new();
        let map = store.configs.get_mut();
        for config in configs {
            map.insert(Self::key(&config), config);
        }
        store
    }

    /// Number of queries served so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Number of upserts attempted so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make subsequent queries fail
    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent upserts fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Stored configuration, bypassing counters
    pub async fn get(&self, tenant_id: &str, rule_id: &str) -> Option<TenantRuleConfig> {
        self.configs
            .read()
            .await
            .get(&(tenant_id.to_string(), rule_id.to_string()))
            .cloned()
    }

    fn key(config: &TenantRuleConfig) -> (String, String) {
        (config.tenant_id.clone(), config.rule.id.clone())
    }
}

impl Default for MemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn query_tenant_config(
        &self,
        tenant_id: &str,
        rule_id: &str,
    ) -> RepositoryResult<ConfigBatches> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(RepositoryError::Other(
                "configuration store unavailable".to_string(),
            ));
        }

        let configs = self.configs.read().await;
        let batch: Vec<TenantRuleConfig> = configs
            .get(&(tenant_id.to_string(), rule_id.to_string()))
            .cloned()
            .into_iter()
            .collect();

        Ok(if batch.is_empty() { vec![] } else { vec![batch] })
    }

    async fn upsert_tenant_config(&self, config: &TenantRuleConfig) -> RepositoryResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Other(
                "configuration store unavailable".to_string(),
            ));
        }

        self.configs
            .write()
            .await
            .insert(Self::key(config), config.clone());
        Ok(())
    }
}
