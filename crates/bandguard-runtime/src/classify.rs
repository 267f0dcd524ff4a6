//! Count-to-band classification

use crate::error::{DataRetrievalError, Result};
use bandguard_core::{Band, RuleResult};

/// Classify `value` into the first band that admits it
///
/// Bands are tried in order; `lowerLimit` is inclusive and `upperLimit`
/// exclusive. When no band matches, the outcome of `result` is left as is.
/// The value is always recorded as the result's independent variable.
pub fn classify(value: Option<u64>, bands: &[Band], mut result: RuleResult) -> Result<RuleResult> {
    let value = value.ok_or(DataRetrievalError::UndefinedValue)?;
    result.indpdnt_varbl = Some(value);

    match bands.iter().find(|band| band.admits(value)) {
        Some(band) => Ok(result.with_outcome(band.sub_rule_ref.clone(), band.reason.clone())),
        None => {
            tracing::warn!(
                rule_id = %result.id,
                value,
                "no band matched history count, outcome unchanged"
            );
            Ok(result)
        }
    }
}
