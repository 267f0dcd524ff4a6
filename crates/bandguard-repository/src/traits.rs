//! Core trait definitions for the configuration layer
//!
//! This module defines two traits:
//!
//! - [`ConfigStore`]: the fallback store holding tenant rule configurations
//! - [`TtlCache`]: the time-expiring key-value capability used in front of it
//!
//! Both are object safe so [`TenantConfigCache`](crate::TenantConfigCache)
//! can hold them behind `Arc<dyn ...>` and tests can swap in their own.

use async_trait::async_trait;
use bandguard_core::TenantRuleConfig;
use std::time::Duration;

use crate::{CacheStats, RepositoryResult};

/// Result batches of a configuration query
pub type ConfigBatches = Vec<Vec<TenantRuleConfig>>;

/// Fallback store for tenant rule configurations
///
/// # Implementation Notes
///
/// - Queries filter on exact tenant and rule id; an empty result is not an
///   error
/// - Upserts are keyed by `(tenant_id, rule_id)`
/// - Errors are returned as-is; callers do not retry
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` for use across async tasks.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Query configurations for a tenant and rule
    ///
    /// # Returns
    /// Zero or more result batches; callers use the first record of the
    /// first batch
    async fn query_tenant_config(
        &self,
        tenant_id: &str,
        rule_id: &str,
    ) -> RepositoryResult<ConfigBatches>;

    /// Insert or replace a configuration by its natural key
    async fn upsert_tenant_config(&self, config: &TenantRuleConfig) -> RepositoryResult<()>;
}

/// Time-expiring key-value cache
///
/// Every operation is atomic with respect to the others: a read sees either
/// the previous value, the new value, or a miss.
///
/// # Examples
///
/// ```no_run
/// # use bandguard_repository::{CacheConfig, MemoryTtlCache, TtlCache};
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let cache: MemoryTtlCache<String> = MemoryTtlCache::new(&CacheConfig::default())?;
///
/// cache.set("t1:r1".to_string(), "config".to_string());
/// assert_eq!(cache.get("t1:r1").as_deref(), Some("config"));
///
/// for key in cache.keys_with_prefix("t1:") {
///     cache.delete(&key);
/// }
/// println!("Hits: {}, misses: {}", cache.stats().hits, cache.stats().misses);
/// # Ok(())
/// # }
/// ```
pub trait TtlCache<V>: Send + Sync {
    /// Get an unexpired value, counting a hit or a miss
    fn get(&self, key: &str) -> Option<V>;

    /// Insert or refresh a value with the default TTL
    fn set(&self, key: String, value: V);

    /// Insert or refresh a value with an explicit TTL
    fn set_with_ttl(&self, key: String, value: V, ttl: Duration);

    /// Remove one key, returning whether it was present
    fn delete(&self, key: &str) -> bool;

    /// Unexpired keys starting with `prefix`
    fn keys_with_prefix(&self, prefix: &str) -> Vec<String>;

    /// Drop every expired entry, returning how many were removed
    fn purge_expired(&self) -> usize;

    /// Current statistics
    fn stats(&self) -> CacheStats;
}
