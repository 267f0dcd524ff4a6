//! Error types for Bandguard Core

use thiserror::Error;

/// Rule configuration is missing a required part
///
/// The message text is part of the external contract: callers and tests
/// match on it verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid config provided - bands not provided or empty")]
    MissingBands,

    #[error("Invalid config provided - exitConditions not provided")]
    MissingExitConditions,

    #[error("Invalid config provided - parameters not provided")]
    MissingParameters,

    #[error("Invalid config provided - maxQueryRange parameter missing")]
    MissingMaxQueryRange,

    #[error("Invalid config provided - maxQueryRange must be a positive integer")]
    InvalidMaxQueryRange,

    #[error("Invalid config provided - {0}")]
    BandLayout(#[from] BandLayoutError),

    #[error("Invalid config provided - {0}")]
    Other(String),
}

/// Band list is not non-overlapping and monotonically ordered
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BandLayoutError {
    #[error("band {sub_rule_ref} has lowerLimit {lower} not below upperLimit {upper}")]
    EmptyBand {
        sub_rule_ref: String,
        lower: u64,
        upper: u64,
    },

    #[error("band {sub_rule_ref} overlaps band {previous}")]
    OverlappingBands {
        previous: String,
        sub_rule_ref: String,
    },

    #[error("band {sub_rule_ref} is ordered before band {previous}")]
    UnorderedBands {
        previous: String,
        sub_rule_ref: String,
    },

    #[error("band {sub_rule_ref} has no lowerLimit but is not the first band")]
    UnboundedLowerNotFirst { sub_rule_ref: String },

    #[error("band {sub_rule_ref} has no upperLimit but is not the last band")]
    UnboundedUpperNotLast { sub_rule_ref: String },
}

/// The triggering request lacks data the evaluation needs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestDataError {
    #[error("Tenant ID is required for tenant-aware rule evaluation")]
    MissingTenantId,

    #[error("DataCache was not found in the request")]
    MissingDataCache,

    #[error("Data Cache does not have required dbtrAcctId")]
    MissingDebtorAccountId,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
