//! Rule configuration validation
//!
//! [`ConfigValidator`] turns a stored [`RuleConfig`] into a
//! [`ValidatedRuleConfig`] before any I/O happens. The checks run in a fixed
//! order (bands, exit conditions, parameters, `maxQueryRange`) so the first
//! failing part is always the one reported.
//!
//! [`validate_band_layout`] is an optional, stricter check meant for startup
//! rather than the evaluation path.

mod bands;

pub use bands::validate_band_layout;

use crate::error::{ConfigError, Result};
use crate::types::{RuleConfig, ValidatedRuleConfig};
use serde_json::Value;

/// Name of the history window parameter
pub const MAX_QUERY_RANGE_PARAM: &str = "maxQueryRange";

/// Validator for rule configurations
pub struct ConfigValidator {
    /// Also require a non-overlapping, ordered band layout
    strict_band_layout: bool,
}

impl ConfigValidator {
    /// Create a validator that only checks required parts
    pub fn new() -> Self {
        Self {
            strict_band_layout: false,
        }
    }

    /// Additionally run [`validate_band_layout`]
    pub fn strict_band_layout(mut self, strict: bool) -> Self {
        self.strict_band_layout = strict;
        self
    }

    /// Validate a rule configuration
    pub fn validate(&self, config: &RuleConfig) -> Result<ValidatedRuleConfig> {
        let body = &config.config;

        let bands = match &body.bands {
            Some(bands) if !bands.is_empty() => bands,
            _ => return Err(ConfigError::MissingBands),
        };
        let exit_conditions = body
            .exit_conditions
            .as_ref()
            .ok_or(ConfigError::MissingExitConditions)?;
        let parameters = body
            .parameters
            .as_ref()
            .ok_or(ConfigError::MissingParameters)?;
        let max_query_range = parse_max_query_range(parameters.get(MAX_QUERY_RANGE_PARAM))?;

        if self.strict_band_layout {
            validate_band_layout(bands)?;
        }

        log::trace!(
            "validated config {} v{}: {} bands, {} exit conditions, maxQueryRange={}ms",
            config.id,
            config.cfg,
            bands.len(),
            exit_conditions.len(),
            max_query_range
        );

        Ok(ValidatedRuleConfig {
            id: config.id.clone(),
            cfg: config.cfg.clone(),
            bands: bands.clone(),
            exit_conditions: exit_conditions.clone(),
            max_query_range,
            parameters: parameters.clone(),
        })
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Read `maxQueryRange` as a positive number of milliseconds
///
/// Absent, `null`, `false`, `0` and `""` count as missing. Anything else
/// must be a positive whole number (or a string holding one).
fn parse_max_query_range(value: Option<&Value>) -> Result<u64> {
    let value = match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => {
            return Err(ConfigError::MissingMaxQueryRange)
        }
        Some(Value::String(s)) if s.is_empty() => return Err(ConfigError::MissingMaxQueryRange),
        Some(value) => value,
    };

    let millis = match value {
        Value::Number(n) => {
            if let Some(millis) = n.as_u64() {
                Some(millis)
            } else {
                n.as_f64()
                    .filter(|f| *f == 0.0 || (*f > 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64))
                    .map(|f| f as u64)
            }
        }
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    match millis {
        Some(0) if matches!(value, Value::Number(_)) => Err(ConfigError::MissingMaxQueryRange),
        Some(millis) if millis > 0 => Ok(millis),
        _ => Err(ConfigError::InvalidMaxQueryRange),
    }
}
