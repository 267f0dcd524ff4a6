//! In-memory TTL cache
//!
//! Entries live in a single mutex-guarded map. Expired entries are dropped
//! when read and by a background task that sweeps the map on a fixed
//! interval. The sweeper holds only a weak reference and stops once the
//! cache is dropped.

use crate::models::{CacheConfig, CacheStats, CachedEntry};
use crate::traits::TtlCache;
use crate::RepositoryResult;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

struct CacheInner<V> {
    entries: Mutex<HashMap<String, CachedEntry<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    default_ttl: Duration,
}

impl<V> CacheInner<V> {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CachedEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }
}

/// In-memory TTL cache with a background expiry sweep
pub struct MemoryTtlCache<V> {
    inner: Arc<CacheInner<V>>,
    sweeper: Option<JoinHandle<()>>,
}

impl<V> MemoryTtlCache<V>
where
    V: Clone + Serialize + Send + Sync + 'static,
{
    /// Create a cache and start its sweeper
    ///
    /// The sweeper is only started when called inside a Tokio runtime;
    /// otherwise expiry is purely passive.
    pub fn new(config: &CacheConfig) -> RepositoryResult<Self> {
        config.validate()?;

        let inner = Arc::new(CacheInner {
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            default_ttl: config.default_ttl,
        });

        let sweeper = match tokio::runtime::Handle::try_current() {
            Ok(handle) => Some(handle.spawn(sweep(Arc::downgrade(&inner), config.sweep_interval))),
            Err(_) => {
                warn!("No Tokio runtime available, cache expiry sweep disabled");
                None
            }
        };

        Ok(Self { inner, sweeper })
    }

    /// Default TTL applied by [`TtlCache::set`]
    pub fn default_ttl(&self) -> Duration {
        self.inner.default_ttl
    }

    /// Whether the background sweeper is running
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }

    fn size_of(value: &V) -> usize {
        serde_json::to_vec(value).map(|bytes| bytes.len()).unwrap_or(0)
    }
}

impl<V> Drop for MemoryTtlCache<V> {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.take() {
            handle.abort();
        }
    }
}

async fn sweep<V>(inner: Weak<CacheInner<V>>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let Some(inner) = inner.upgrade() else {
            break;
        };
        let removed = inner.purge_expired();
        if removed > 0 {
            debug!(removed, "Swept expired cache entries");
        }
    }
}

impl<V> TtlCache<V> for MemoryTtlCache<V>
where
    V: Clone + Serialize + Send + Sync + 'static,
{
    fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.inner.lock();

        let value = match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        };
        drop(entries);

        match value {
            Some(value) => {
                self.inner.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            None => {
                self.inner.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn set(&self, key: String, value: V) {
        self.set_with_ttl(key, value, self.inner.default_ttl);
    }

    fn set_with_ttl(&self, key: String, value: V, ttl: Duration) {
        let size_bytes = Self::size_of(&value);
        let entry = CachedEntry::new(value, size_bytes, ttl);
        self.inner.lock().insert(key, entry);
    }

    fn delete(&self, key: &str) -> bool {
        self.inner.lock().remove(key).is_some()
    }

    fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let now = Instant::now();
        self.inner
            .lock()
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && !entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    fn purge_expired(&self) -> usize {
        self.inner.purge_expired()
    }

    fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.inner.lock();

        let mut stats = CacheStats {
            hits: self.inner.hits.load(Ordering::Relaxed),
            misses: self.inner.misses.load(Ordering::Relaxed),
            ..Default::default()
        };
        for (key, entry) in entries.iter().filter(|(_, entry)| !entry.is_expired(now)) {
            stats.size += 1;
            stats.key_bytes += key.len();
            stats.value_bytes += entry.size_bytes;
        }
        stats
    }
}
