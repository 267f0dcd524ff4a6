//! Type definitions shared by the evaluation engine and its stores

pub mod config;
pub mod request;
pub mod result;

pub use config::{
    Band, ExitCondition, RuleConfig, RuleConfigBody, TenantRuleConfig, ValidatedRuleConfig,
    UNSUCCESSFUL_EXIT_REF,
};
pub use request::{DataCache, InstructedAmount, PaymentStatus, RuleRequest, SUCCESSFUL_STATUS};
pub use result::RuleResult;
