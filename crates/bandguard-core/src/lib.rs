//! Bandguard Core - Core types and definitions for the Bandguard rule engine
//!
//! This crate provides the fundamental types used across the Bandguard crates:
//! - Request types for the triggering payment-status message
//! - Rule configuration types (bands, exit conditions, parameters)
//! - Rule result type
//! - Configuration validation
//! - Error types

pub mod error;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use error::{BandLayoutError, ConfigError, RequestDataError};
pub use types::{
    Band, DataCache, ExitCondition, InstructedAmount, PaymentStatus, RuleConfig, RuleConfigBody,
    RuleRequest, RuleResult, TenantRuleConfig, ValidatedRuleConfig, SUCCESSFUL_STATUS,
    UNSUCCESSFUL_EXIT_REF,
};
pub use validation::{validate_band_layout, ConfigValidator};
