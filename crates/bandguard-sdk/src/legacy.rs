//! Positional entry points
//!
//! Thin wrappers for callers that pass arguments positionally. They build the
//! option bundles and forward to [`RuleEvaluator`]; results and errors are
//! identical to the canonical calls.

use crate::error::EvaluationError;
use crate::evaluator::{EvaluateOptions, RuleEvaluator, TenantEvaluateOptions};
use bandguard_core::{RuleConfig, RuleRequest, RuleResult};
use bandguard_repository::TenantConfigCache;

/// Direct evaluation: `(request, result, config)`
pub async fn evaluate_positional(
    evaluator: &RuleEvaluator,
    request: &RuleRequest,
    result: RuleResult,
    config: &RuleConfig,
) -> Result<RuleResult, EvaluationError> {
    evaluator
        .evaluate(EvaluateOptions {
            request,
            config,
            result,
        })
        .await
}

/// Tenant-resolved evaluation: `(request, result, rule_id, cache)`
pub async fn evaluate_for_tenant_positional(
    evaluator: &RuleEvaluator,
    request: &RuleRequest,
    result: RuleResult,
    rule_id: &str,
    cache: Option<&TenantConfigCache>,
) -> Result<RuleResult, EvaluationError> {
    evaluator
        .evaluate_for_tenant(TenantEvaluateOptions {
            request,
            rule_id,
            result,
            cache,
        })
        .await
}
