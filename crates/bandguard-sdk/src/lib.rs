//! Bandguard SDK
//!
//! High-level API for evaluating band rules over payment-status messages,
//! either with a caller-supplied configuration or with the requesting
//! tenant's configuration resolved through a cache.

pub mod builder;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod legacy;

// Re-export main types
pub use builder::RuleEvaluatorBuilder;
pub use config::{CacheSettings, EngineConfig};
pub use error::{ErrorKind, EvaluationError, Result, SdkError};
pub use evaluator::{EvaluateOptions, RuleEvaluator, TenantEvaluateOptions};
pub use legacy::{evaluate_for_tenant_positional, evaluate_positional};

// Re-export commonly used types from dependencies
pub use bandguard_core::{
    Band, DataCache, ExitCondition, PaymentStatus, RuleConfig, RuleRequest, RuleResult,
    TenantRuleConfig,
};
pub use bandguard_repository::{ConfigStore, TenantConfigCache};
pub use bandguard_runtime::{HistoryQuery, HistoryRows, HistoryStore};
