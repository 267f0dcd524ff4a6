//! Rule result

use serde::{Deserialize, Serialize};

/// Outcome of one rule evaluation
///
/// Created by the caller with its identity filled in; the engine updates
/// `sub_rule_ref`, `reason` and `indpdnt_varbl` and hands it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResult {
    /// Rule ID
    pub id: String,

    /// Configuration version
    pub cfg: String,

    /// Band or exit condition that produced the outcome
    pub sub_rule_ref: String,

    #[serde(default)]
    pub reason: String,

    /// Classified history count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indpdnt_varbl: Option<u64>,

    /// Processing time in nanoseconds, filled by the caller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prcg_tm: Option<u64>,
}

impl RuleResult {
    /// Create a result with the default `.err` outcome
    pub fn new(id: impl Into<String>, cfg: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cfg: cfg.into(),
            sub_rule_ref: ".err".to_string(),
            reason: String::new(),
            indpdnt_varbl: None,
            prcg_tm: None,
        }
    }

    /// Replace the outcome, keeping every other field
    pub fn with_outcome(mut self, sub_rule_ref: impl Into<String>, reason: impl Into<String>) -> Self {
        self.sub_rule_ref = sub_rule_ref.into();
        self.reason = reason.into();
        self
    }
}
