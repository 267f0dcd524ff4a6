//! Data models for the repository layer

use crate::error::{RepositoryError, RepositoryResult};
use std::time::Duration;
use tokio::time::Instant;

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of live entries in cache
    pub size: usize,
    /// Approximate bytes held by keys
    pub key_bytes: usize,
    /// Approximate bytes held by values
    pub value_bytes: usize,
}

impl CacheStats {
    /// Calculate cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total memory used (approximate, in bytes)
    pub fn memory_bytes(&self) -> usize {
        self.key_bytes + self.value_bytes
    }
}

/// A cached value with TTL support
#[derive(Debug, Clone)]
pub(crate) struct CachedEntry<T> {
    /// The cached data
    pub value: T,
    /// Approximate serialized size of the value
    pub size_bytes: usize,
    /// When this entry stops being served
    pub expires_at: Instant,
}

impl<T> CachedEntry<T> {
    /// Create a new cached entry
    pub fn new(value: T, size_bytes: usize, ttl: Duration) -> Self {
        Self {
            value,
            size_bytes,
            expires_at: Instant::now() + ttl,
        }
    }

    /// Check if this cached entry has expired
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Time-to-live for cache entries
    pub default_ttl: Duration,
    /// Interval of the background expiry sweep
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(300),   // 5 minutes
            sweep_interval: Duration::from_secs(60), // 1 minute
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Set the sweep interval
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Reject a zero TTL or a zero sweep interval
    pub fn validate(&self) -> RepositoryResult<()> {
        if self.default_ttl.is_zero() {
            return Err(RepositoryError::InvalidConfig(
                "ttl must be greater than zero".to_string(),
            ));
        }
        if self.sweep_interval.is_zero() {
            return Err(RepositoryError::InvalidConfig(
                "sweep interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
