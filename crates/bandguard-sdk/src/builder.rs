//! Builder pattern for RuleEvaluator

use crate::config::EngineConfig;
use crate::error::{Result, SdkError};
use crate::evaluator::RuleEvaluator;
use bandguard_core::{ConfigValidator, RuleConfig};
use bandguard_repository::{ConfigStore, TenantConfigCache};
use bandguard_runtime::HistoryStore;
use std::sync::Arc;

/// Builder for RuleEvaluator
///
/// # Example
///
/// ```rust,ignore
/// use bandguard_sdk::RuleEvaluatorBuilder;
///
/// // Direct evaluation only
/// let evaluator = RuleEvaluatorBuilder::new()
///     .with_history_store(history)
///     .build()?;
///
/// // Tenant-aware evaluation with a default cache over a config store
/// let evaluator = RuleEvaluatorBuilder::new()
///     .with_history_store(history)
///     .with_config_store(Arc::new(MemoryConfigStore::new()))
///     .with_engine_config(EngineConfig::load()?)
///     .build()?;
/// ```
pub struct RuleEvaluatorBuilder {
    config: EngineConfig,
    history: Option<Arc<dyn HistoryStore>>,
    config_store: Option<Arc<dyn ConfigStore>>,
    cache: Option<TenantConfigCache>,
    global_config: Option<RuleConfig>,
}

impl RuleEvaluatorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
            history: None,
            config_store: None,
            cache: None,
            global_config: None,
        }
    }

    /// Set the history store (required)
    pub fn with_history_store(mut self, store: Arc<dyn HistoryStore>) -> Self {
        self.history = Some(store);
        self
    }

    /// Set the configuration store backing the default tenant cache
    pub fn with_config_store(mut self, store: Arc<dyn ConfigStore>) -> Self {
        self.config_store = Some(store);
        self
    }

    /// Use an existing tenant cache as the default cache
    pub fn with_cache(mut self, cache: TenantConfigCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set the engine configuration
    pub fn with_engine_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set a rule configuration shared by all tenants
    ///
    /// It is validated when the evaluator is built.
    pub fn with_global_config(mut self, config: RuleConfig) -> Self {
        self.global_config = Some(config);
        self
    }

    /// Enable or disable the band layout check
    pub fn strict_band_layout(mut self, strict: bool) -> Self {
        self.config.strict_band_layout = strict;
        self
    }

    /// Build the evaluator
    pub fn build(self) -> Result<RuleEvaluator> {
        self.config.validate()?;

        let history = self
            .history
            .ok_or_else(|| SdkError::ConfigError("history store is required".to_string()))?;

        if let Some(ref global) = self.global_config {
            ConfigValidator::new()
                .strict_band_layout(self.config.strict_band_layout)
                .validate(global)?;
            tracing::info!(rule_id = %global.id, cfg = %global.cfg, "Global rule configuration accepted");
        }

        tracing::debug!(
            has_config_store = self.config_store.is_some(),
            has_cache = self.cache.is_some(),
            "Building rule evaluator"
        );

        Ok(RuleEvaluator::from_parts(
            history,
            self.config_store,
            self.config,
            self.cache,
            self.global_config,
        ))
    }
}

impl Default for RuleEvaluatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
