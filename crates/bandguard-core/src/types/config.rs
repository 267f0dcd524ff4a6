//! Rule configuration definitions
//!
//! [`RuleConfig`] mirrors the stored document shape, where every nested part
//! may be missing. It becomes a [`ValidatedRuleConfig`] only by passing
//! through [`ConfigValidator`](crate::validation::ConfigValidator).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Exit condition reference for "the triggering transaction was unsuccessful"
pub const UNSUCCESSFUL_EXIT_REF: &str = ".x00";

/// Rule configuration as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Rule ID
    pub id: String,

    /// Configuration version
    pub cfg: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    /// Nested configuration
    #[serde(default)]
    pub config: RuleConfigBody,
}

/// Nested rule configuration, possibly partial
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConfigBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bands: Option<Vec<Band>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_conditions: Option<Vec<ExitCondition>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
}

/// Labeled count interval: `lower_limit <= count < upper_limit`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Band {
    pub sub_rule_ref: String,

    /// Inclusive lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_limit: Option<u64>,

    /// Exclusive upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_limit: Option<u64>,

    pub reason: String,
}

/// Short-circuit outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitCondition {
    pub sub_rule_ref: String,
    pub reason: String,
}

/// Rule configuration owned by a tenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantRuleConfig {
    pub tenant_id: String,

    #[serde(flatten)]
    pub rule: RuleConfig,
}

/// Rule configuration that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRuleConfig {
    pub id: String,
    pub cfg: String,
    /// Non-empty, in evaluation order
    pub bands: Vec<Band>,
    pub exit_conditions: Vec<ExitCondition>,
    /// History window length in milliseconds, always positive
    pub max_query_range: u64,
    pub parameters: Map<String, Value>,
}

impl RuleConfig {
    /// Create a configuration with an empty body
    pub fn new(id: impl Into<String>, cfg: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cfg: cfg.into(),
            desc: None,
            config: RuleConfigBody::default(),
        }
    }

    pub fn with_bands(mut self, bands: Vec<Band>) -> Self {
        self.config.bands = Some(bands);
        self
    }

    pub fn with_exit_conditions(mut self, exit_conditions: Vec<ExitCondition>) -> Self {
        self.config.exit_conditions = Some(exit_conditions);
        self
    }

    pub fn with_parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.config.parameters = Some(parameters);
        self
    }

    /// Set `maxQueryRange`, creating the parameter map if needed
    pub fn with_max_query_range(mut self, millis: u64) -> Self {
        self.config
            .parameters
            .get_or_insert_with(Map::new)
            .insert("maxQueryRange".to_string(), Value::from(millis));
        self
    }
}

impl Band {
    pub fn new(
        sub_rule_ref: impl Into<String>,
        lower_limit: Option<u64>,
        upper_limit: Option<u64>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            sub_rule_ref: sub_rule_ref.into(),
            lower_limit,
            upper_limit,
            reason: reason.into(),
        }
    }

    /// Whether `value` falls inside this band
    pub fn admits(&self, value: u64) -> bool {
        self.lower_limit.map_or(true, |lower| value >= lower)
            && self.upper_limit.map_or(true, |upper| value < upper)
    }
}

impl ExitCondition {
    pub fn new(sub_rule_ref: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            sub_rule_ref: sub_rule_ref.into(),
            reason: reason.into(),
        }
    }
}

impl TenantRuleConfig {
    pub fn new(tenant_id: impl Into<String>, rule: RuleConfig) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            rule,
        }
    }

    pub fn rule_id(&self) -> &str {
        &self.rule.id
    }

    /// Cache key: `tenantId:ruleId`
    pub fn cache_key(&self) -> String {
        Self::key_for(&self.tenant_id, &self.rule.id)
    }

    /// Cache key for a tenant and rule
    pub fn key_for(tenant_id: &str, rule_id: &str) -> String {
        format!("{}:{}", tenant_id, rule_id)
    }
}

impl ValidatedRuleConfig {
    /// Exit condition marking an unsuccessful triggering transaction
    pub fn unsuccessful_exit(&self) -> Option<&ExitCondition> {
        self.exit_conditions
            .iter()
            .find(|exit| exit.sub_rule_ref == UNSUCCESSFUL_EXIT_REF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_bounds_are_lower_inclusive_upper_exclusive() {
        let band = Band::new(".02", Some(2), Some(4), "two or three");

        assert!(!band.admits(1));
        assert!(band.admits(2));
        assert!(band.admits(3));
        assert!(!band.admits(4));
    }

    #[test]
    fn test_open_bounds() {
        assert!(Band::new(".01", None, Some(2), "few").admits(0));
        assert!(Band::new(".03", Some(4), None, "many").admits(u64::MAX));
        assert!(Band::new(".00", None, None, "all").admits(17));
    }

    #[test]
    fn test_rule_config_deserialize() {
        let json = r#"{
            "id": "901@1.0.0",
            "cfg": "1.0.0",
            "config": {
                "parameters": { "maxQueryRange": 86400000 },
                "exitConditions": [
                    { "subRuleRef": ".x00", "reason": "Incoming transaction is unsuccessful" }
                ],
                "bands": [
                    { "subRuleRef": ".01", "upperLimit": 2, "reason": "Single transaction" },
                    { "subRuleRef": ".02", "lowerLimit": 2, "upperLimit": 4, "reason": "Few" },
                    { "subRuleRef": ".03", "lowerLimit": 4, "reason": "Many" }
                ]
            }
        }"#;

        let config: RuleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.id, "901@1.0.0");

        let bands = config.config.bands.unwrap();
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[0].lower_limit, None);
        assert_eq!(bands[2].upper_limit, None);
        assert_eq!(config.config.exit_conditions.unwrap()[0].sub_rule_ref, ".x00");
    }

    #[test]
    fn test_missing_body_parts_deserialize_as_none() {
        let config: RuleConfig = serde_json::from_str(r#"{ "id": "901", "cfg": "1.0.0" }"#).unwrap();

        assert!(config.config.bands.is_none());
        assert!(config.config.exit_conditions.is_none());
        assert!(config.config.parameters.is_none());
    }

    #[test]
    fn test_tenant_rule_config_from_yaml() {
        let yaml = r#"
tenantId: tenant-a
id: 901@1.0.0
cfg: 1.0.0
config:
  bands:
    - subRuleRef: ".01"
      upperLimit: 3
      reason: Few
  exitConditions: []
  parameters:
    maxQueryRange: 3600000
"#;

        let config: TenantRuleConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.tenant_id, "tenant-a");
        assert_eq!(config.rule_id(), "901@1.0.0");
        assert_eq!(config.rule.config.bands.unwrap()[0].upper_limit, Some(3));
        assert!(config.rule.config.exit_conditions.unwrap().is_empty());
    }

    #[test]
    fn test_tenant_rule_config_flattens_rule() {
        let tenant_config = TenantRuleConfig::new(
            "tenant-a",
            RuleConfig::new("901@1.0.0", "1.0.0").with_max_query_range(1000),
        );

        let json = serde_json::to_value(&tenant_config).unwrap();
        assert_eq!(json["tenantId"], "tenant-a");
        assert_eq!(json["id"], "901@1.0.0");
        assert_eq!(json["config"]["parameters"]["maxQueryRange"], 1000);

        let back: TenantRuleConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, tenant_config);
        assert_eq!(back.cache_key(), "tenant-a:901@1.0.0");
    }
}
