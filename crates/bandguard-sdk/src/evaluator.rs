//! Rule evaluator
//!
//! Runs one band rule over a payment-status message:
//!
//! 1. validate the rule configuration
//! 2. exit early when the transaction was unsuccessful
//! 3. count the debtor account's history inside the query window
//! 4. classify the count into the first matching band
//!
//! [`RuleEvaluator::evaluate`] takes the configuration from the caller.
//! [`RuleEvaluator::evaluate_for_tenant`] resolves it per tenant through a
//! [`TenantConfigCache`] and restricts the history count to that tenant.

use crate::config::EngineConfig;
use crate::error::EvaluationError;
use bandguard_core::{ConfigValidator, RequestDataError, RuleConfig, RuleRequest, RuleResult};
use bandguard_repository::{ConfigStore, TenantConfigCache};
use bandguard_runtime::{
    classify, evaluate_exit_conditions, read_count, ExitOutcome, HistoryQueryBuilder, HistoryStore,
    RuleLogger,
};
use std::sync::{Arc, OnceLock};

type EvalResult<T> = std::result::Result<T, EvaluationError>;

/// Inputs of a direct evaluation
pub struct EvaluateOptions<'a> {
    pub request: &'a RuleRequest,
    pub config: &'a RuleConfig,
    /// Initial result; returned updated
    pub result: RuleResult,
}

/// Inputs of a tenant-resolved evaluation
pub struct TenantEvaluateOptions<'a> {
    pub request: &'a RuleRequest,
    /// Base rule id, e.g. `901@1.0.0`
    pub rule_id: &'a str,
    pub result: RuleResult,
    /// Cache to resolve through; the evaluator's own cache when `None`
    pub cache: Option<&'a TenantConfigCache>,
}

/// Band rule evaluator
pub struct RuleEvaluator {
    history: Arc<dyn HistoryStore>,
    config_store: Option<Arc<dyn ConfigStore>>,
    engine_config: EngineConfig,
    global_config: Option<RuleConfig>,
    default_cache: OnceLock<TenantConfigCache>,
    validator: ConfigValidator,
}

impl RuleEvaluator {
    /// Create an evaluator over a history store with default settings
    pub fn new(history: Arc<dyn HistoryStore>) -> Self {
        Self::from_parts(history, None, EngineConfig::default(), None, None)
    }

    pub(crate) fn from_parts(
        history: Arc<dyn HistoryStore>,
        config_store: Option<Arc<dyn ConfigStore>>,
        engine_config: EngineConfig,
        cache: Option<TenantConfigCache>,
        global_config: Option<RuleConfig>,
    ) -> Self {
        Self {
            history,
            config_store,
            engine_config,
            global_config,
            default_cache: match cache {
                Some(cache) => OnceLock::from(cache),
                None => OnceLock::new(),
            },
            validator: ConfigValidator::new(),
        }
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine_config
    }

    /// Rule configuration supplied at build time, if any
    pub fn global_config(&self) -> Option<&RuleConfig> {
        self.global_config.as_ref()
    }

    /// Evaluate with a caller-supplied rule configuration
    pub async fn evaluate(&self, options: EvaluateOptions<'_>) -> EvalResult<RuleResult> {
        let EvaluateOptions {
            request,
            config,
            result,
        } = options;
        self.run(request, config, result, None).await
    }

    /// Evaluate with the configuration supplied at build time
    pub async fn evaluate_global(
        &self,
        request: &RuleRequest,
        result: RuleResult,
    ) -> EvalResult<RuleResult> {
        let config = self
            .global_config
            .as_ref()
            .ok_or(EvaluationError::Unconfigured("global rule configuration"))?;
        self.run(request, config, result, None).await
    }

    /// Evaluate with the requesting tenant's configuration of a rule
    ///
    /// The tenant id is checked before any lookup. The history count only
    /// includes transactions of the same tenant.
    pub async fn evaluate_for_tenant(
        &self,
        options: TenantEvaluateOptions<'_>,
    ) -> EvalResult<RuleResult> {
        let TenantEvaluateOptions {
            request,
            rule_id,
            result,
            cache,
        } = options;

        let tenant_id = request.tenant().ok_or(RequestDataError::MissingTenantId)?;
        let cache = match cache {
            Some(cache) => cache,
            None => self.default_cache()?,
        };

        let tenant_config = cache.resolve(tenant_id, rule_id).await?.ok_or_else(|| {
            EvaluationError::TenantConfigNotFound {
                tenant_id: tenant_id.to_string(),
                rule_id: rule_id.to_string(),
            }
        })?;

        tracing::debug!(
            tenant_id,
            rule_id,
            cfg = %tenant_config.rule.cfg,
            msg_id = request.msg_id(),
            "Resolved tenant rule configuration"
        );

        self.run(request, &tenant_config.rule, result, Some(tenant_id))
            .await
    }

    /// The evaluator's own tenant configuration cache, built on first use
    pub fn default_cache(&self) -> EvalResult<&TenantConfigCache> {
        if let Some(cache) = self.default_cache.get() {
            return Ok(cache);
        }

        let store = self
            .config_store
            .clone()
            .ok_or(EvaluationError::Unconfigured("configuration store"))?;
        let cache = TenantConfigCache::with_config(store, self.engine_config.cache.to_cache_config())?;

        // A concurrent caller may have won; its cache is kept and ours dropped
        Ok(self.default_cache.get_or_init(|| cache))
    }

    async fn run(
        &self,
        request: &RuleRequest,
        config: &RuleConfig,
        result: RuleResult,
        tenant_id: Option<&str>,
    ) -> EvalResult<RuleResult> {
        let logger = RuleLogger::new(config.id.as_str());
        let outcome = self.run_steps(&logger, request, config, result, tenant_id).await;

        if let Err(ref err) = outcome {
            logger.error(&err.to_string(), Some(request.msg_id()));
        }
        outcome
    }

    async fn run_steps(
        &self,
        logger: &RuleLogger,
        request: &RuleRequest,
        config: &RuleConfig,
        result: RuleResult,
        tenant_id: Option<&str>,
    ) -> EvalResult<RuleResult> {
        let msg_id = Some(request.msg_id());
        let config = self.validator.validate(config)?;

        let result = match evaluate_exit_conditions(request, &config, result)? {
            ExitOutcome::Exited(result) => {
                logger.trace("Unsuccessful transaction, exit condition applied", msg_id);
                return Ok(result);
            }
            ExitOutcome::Continue(result) => result,
        };

        let mut builder = HistoryQueryBuilder::new(request, config.max_query_range);
        if let Some(tenant_id) = tenant_id {
            builder = builder.with_tenant(tenant_id);
        }
        let query = builder.build()?;

        let history_logger = logger.child("history");
        history_logger.trace(
            &format!(
                "Counting {} {} from {} to {}",
                query.account_key, query.tx_tp, query.window.start, query.window.end
            ),
            msg_id,
        );

        let rows = self
            .history
            .query_history(&query)
            .await
            .map_err(EvaluationError::HistoryStore)?;
        let count = read_count(rows)?;
        history_logger.trace(&format!("History count {}", count), msg_id);

        let result = classify(Some(count), &config.bands, result)?;
        logger.trace(
            &format!("Classified as {} ({})", result.sub_rule_ref, result.reason),
            msg_id,
        );
        Ok(result)
    }
}
