//! Tenant configuration cache
//!
//! Maps `(tenant_id, rule_id)` to the tenant's rule configuration. Lookups
//! are served from a [`TtlCache`] and fall back to a [`ConfigStore`] on a
//! miss. Writes go to the store first; the cache is only updated once the
//! store accepted the write.
//!
//! Every write, invalidation and clear bumps a shared generation. A miss
//! only caches what it fetched if the generation is unchanged, so a record
//! read before a concurrent write never replaces that write's value.

use bandguard_core::TenantRuleConfig;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::cache::MemoryTtlCache;
use crate::models::{CacheConfig, CacheStats};
use crate::traits::{ConfigStore, TtlCache};
use crate::RepositoryResult;

/// Cache of tenant rule configurations in front of a fallback store
///
/// Cloning is cheap and clones share the same entries.
#[derive(Clone)]
pub struct TenantConfigCache {
    store: Arc<dyn ConfigStore>,
    cache: Arc<dyn TtlCache<TenantRuleConfig>>,
    generation: Arc<Mutex<u64>>,
}

impl TenantConfigCache {
    /// Create a cache with the default TTL and sweep interval
    pub fn new(store: Arc<dyn ConfigStore>) -> RepositoryResult<Self> {
        Self::with_config(store, CacheConfig::default())
    }

    /// Create a cache with a custom configuration
    pub fn with_config(store: Arc<dyn ConfigStore>, config: CacheConfig) -> RepositoryResult<Self> {
        let cache = MemoryTtlCache::new(&config)?;
        Ok(Self::with_cache(store, Arc::new(cache)))
    }

    /// Create a cache over an existing [`TtlCache`]
    pub fn with_cache(
        store: Arc<dyn ConfigStore>,
        cache: Arc<dyn TtlCache<TenantRuleConfig>>,
    ) -> Self {
        Self {
            store,
            cache,
            generation: Arc::new(Mutex::new(0)),
        }
    }

    fn generation(&self) -> MutexGuard<'_, u64> {
        self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a cache mutation under a new generation
    fn bump<T>(&self, mutate: impl FnOnce() -> T) -> T {
        let mut generation = self.generation();
        *generation += 1;
        mutate()
    }

    /// Resolve the configuration of a tenant's rule
    ///
    /// Returns `Ok(None)` when the store holds no matching configuration.
    /// Store errors are returned unchanged.
    pub async fn resolve(
        &self,
        tenant_id: &str,
        rule_id: &str,
    ) -> RepositoryResult<Option<TenantRuleConfig>> {
        let key = TenantRuleConfig::key_for(tenant_id, rule_id);

        if let Some(config) = self.cache.get(&key) {
            debug!(tenant_id, rule_id, "Tenant configuration cache hit");
            return Ok(Some(config));
        }
        debug!(tenant_id, rule_id, "Tenant configuration cache miss");

        let seen = *self.generation();
        let batches = self.store.query_tenant_config(tenant_id, rule_id).await?;
        let config = batches
            .into_iter()
            .next()
            .and_then(|batch| batch.into_iter().next());

        if let Some(ref config) = config {
            let generation = self.generation();
            if *generation == seen {
                self.cache.set(key, config.clone());
            } else {
                debug!(tenant_id, rule_id, "Configuration changed during lookup, not caching");
            }
        }
        Ok(config)
    }

    /// Write a configuration through to the store, then cache it
    pub async fn store(&self, config: TenantRuleConfig) -> RepositoryResult<()> {
        self.store.upsert_tenant_config(&config).await?;

        let key = config.cache_key();
        debug!(key = %key, "Stored tenant configuration");
        self.bump(|| self.cache.set(key, config));
        Ok(())
    }

    /// Remove one tenant rule configuration from the cache
    pub fn invalidate(&self, tenant_id: &str, rule_id: &str) -> bool {
        let key = TenantRuleConfig::key_for(tenant_id, rule_id);
        self.bump(|| self.cache.delete(&key))
    }

    /// Remove every cached configuration of a tenant
    pub fn clear_tenant(&self, tenant_id: &str) -> usize {
        let prefix = format!("{}:", tenant_id);
        let removed = self.bump(|| {
            self.cache
                .keys_with_prefix(&prefix)
                .iter()
                .filter(|key| self.cache.delete(key))
                .count()
        });

        debug!(tenant_id, removed, "Cleared tenant configurations");
        removed
    }

    /// Cache statistics
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
