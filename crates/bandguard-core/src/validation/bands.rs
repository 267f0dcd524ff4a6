//! Band layout validation

use crate::error::BandLayoutError;
use crate::types::Band;

/// Check that bands are non-empty, non-overlapping and in ascending order
///
/// Only the first band may omit `lowerLimit` and only the last may omit
/// `upperLimit`. Gaps between consecutive bands are allowed: a count falling
/// into a gap simply matches no band.
pub fn validate_band_layout(bands: &[Band]) -> Result<(), BandLayoutError> {
    let last = bands.len().saturating_sub(1);

    for (index, band) in bands.iter().enumerate() {
        if let (Some(lower), Some(upper)) = (band.lower_limit, band.upper_limit) {
            if lower >= upper {
                return Err(BandLayoutError::EmptyBand {
                    sub_rule_ref: band.sub_rule_ref.clone(),
                    lower,
                    upper,
                });
            }
        }
        if index > 0 && band.lower_limit.is_none() {
            return Err(BandLayoutError::UnboundedLowerNotFirst {
                sub_rule_ref: band.sub_rule_ref.clone(),
            });
        }
        if index < last && band.upper_limit.is_none() {
            return Err(BandLayoutError::UnboundedUpperNotLast {
                sub_rule_ref: band.sub_rule_ref.clone(),
            });
        }
    }

    for pair in bands.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        // Both bounds exist here: checked above.
        let (Some(previous_upper), Some(current_lower)) = (previous.upper_limit, current.lower_limit)
        else {
            continue;
        };
        if current_lower >= previous_upper {
            continue;
        }

        let previous_lower = previous.lower_limit.unwrap_or(0);
        let entirely_before = current
            .upper_limit
            .map_or(false, |current_upper| current_upper <= previous_lower);

        return Err(if entirely_before {
            BandLayoutError::UnorderedBands {
                previous: previous.sub_rule_ref.clone(),
                sub_rule_ref: current.sub_rule_ref.clone(),
            }
        } else {
            BandLayoutError::OverlappingBands {
                previous: previous.sub_rule_ref.clone(),
                sub_rule_ref: current.sub_rule_ref.clone(),
            }
        });
    }

    Ok(())
}
