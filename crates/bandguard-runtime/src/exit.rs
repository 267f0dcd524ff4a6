//! Exit-condition short-circuiting
//!
//! A triggering transaction that was not accepted and settled never reaches
//! the history query: it exits with the `.x00` condition from configuration.

use crate::error::{Result, RuntimeError};
use bandguard_core::{RuleRequest, RuleResult, ValidatedRuleConfig};

pub const UNSUCCESSFUL_NO_EXIT_CONDITION: &str =
    "Unsuccessful transaction and no exit condition in config";

/// Outcome of the exit-condition check
#[derive(Debug, Clone, PartialEq)]
pub enum ExitOutcome {
    /// Evaluation is finished; the result carries the exit condition
    Exited(RuleResult),
    /// Transaction succeeded; continue to history counting
    Continue(RuleResult),
}

/// Check the request status against the configured exit conditions
pub fn evaluate_exit_conditions(
    request: &RuleRequest,
    config: &ValidatedRuleConfig,
    result: RuleResult,
) -> Result<ExitOutcome> {
    if request.is_successful() {
        return Ok(ExitOutcome::Continue(result));
    }

    match config.unsuccessful_exit() {
        Some(exit) => Ok(ExitOutcome::Exited(
            result.with_outcome(exit.sub_rule_ref.clone(), exit.reason.clone()),
        )),
        None => Err(RuntimeError::BusinessRule(
            UNSUCCESSFUL_NO_EXIT_CONDITION.to_string(),
        )),
    }
}
