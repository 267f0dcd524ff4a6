//! Tenant configuration layer for the Bandguard rule engine
//!
//! This crate resolves tenant-specific rule configurations through a
//! time-expiring cache backed by a fallback configuration store.
//!
//! # Features
//!
//! - **Tenant Config Cache**: `(tenant, rule)` lookups served from memory
//! - **TTL Cache**: passive expiry on read plus a periodic background sweep
//! - **Memory Store**: in-process store for tests and development
//! - **File System Store**: YAML/JSON documents on disk
//! - **PostgreSQL Store**: database-backed storage (`postgres` feature)
//!
//! # Quick Start
//!
//! ```no_run
//! use bandguard_repository::{MemoryConfigStore, TenantConfigCache};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(MemoryConfigStore::new());
//!     let cache = TenantConfigCache::new(store)?;
//!
//!     // First resolve queries the store, later ones are served from memory
//!     if let Some(config) = cache.resolve("tenant-a", "901@1.0.0").await? {
//!         println!("Resolved {} for {}", config.rule.id, config.tenant_id);
//!     }
//!
//!     let stats = cache.stats();
//!     println!("Cache hit rate: {:.2}%", stats.hit_rate() * 100.0);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │        Rule Evaluator                  │
//! └──────────────┬─────────────────────────┘
//!                │ resolve / store
//!                ↓
//! ┌────────────────────────────────────────┐
//! │    TenantConfigCache                   │
//! │  - TtlCache (get/set/delete/prefix)    │
//! └──────────────┬─────────────────────────┘
//!                │ on miss / write-through
//!       ┌────────┼─────────────┐
//!       ↓        ↓             ↓
//! ┌──────────┐ ┌────────────┐ ┌──────────────┐
//! │ Memory   │ │ FileSystem │ │ PostgreSQL   │
//! └──────────┘ └────────────┘ └──────────────┘
//! ```

pub mod cache;
pub mod error;
pub mod file_system;
pub mod memory;
pub mod models;
pub mod tenant_cache;
pub mod traits;

#[cfg(feature = "postgres")]
pub mod postgres;

// Re-exports - Error
pub use error::{RepositoryError, RepositoryResult};

// Re-exports - Stores and caches
pub use cache::MemoryTtlCache;
pub use file_system::FileSystemConfigStore;
pub use memory::MemoryConfigStore;
pub use models::*;
pub use tenant_cache::TenantConfigCache;
pub use traits::*;

#[cfg(feature = "postgres")]
pub use postgres::PostgresConfigStore;
