//! SDK error types

use bandguard_core::{ConfigError, RequestDataError};
use bandguard_repository::RepositoryError;
use bandguard_runtime::{DataRetrievalError, RuntimeError};
use thiserror::Error;

/// Category of an evaluation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    RequestData,
    BusinessRule,
    DataRetrieval,
    TenantConfigNotFound,
    Store,
}

/// Error returned by a rule evaluation
///
/// Messages of the domain variants are fixed strings that callers match on.
/// Store failures are passed through with their original message.
#[derive(Error, Debug)]
pub enum EvaluationError {
    /// Rule configuration is missing a required part
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// The evaluator lacks a collaborator the call needs
    #[error("Rule evaluator has no {0} configured")]
    Unconfigured(&'static str),

    /// Request lacks the tenant, data cache or debtor account
    #[error(transparent)]
    RequestData(#[from] RequestDataError),

    /// Unsuccessful transaction with no exit condition
    #[error("{0}")]
    BusinessRule(String),

    /// History count missing or unusable
    #[error(transparent)]
    DataRetrieval(#[from] DataRetrievalError),

    /// Tenant has no configuration for the rule
    #[error("No configuration found for tenant {tenant_id}, rule {rule_id}")]
    TenantConfigNotFound { tenant_id: String, rule_id: String },

    /// History store failure
    #[error(transparent)]
    HistoryStore(anyhow::Error),

    /// Configuration store failure
    #[error(transparent)]
    ConfigStore(#[from] RepositoryError),
}

impl EvaluationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) | Self::Unconfigured(_) => ErrorKind::Configuration,
            Self::RequestData(_) => ErrorKind::RequestData,
            Self::BusinessRule(_) => ErrorKind::BusinessRule,
            Self::DataRetrieval(_) => ErrorKind::DataRetrieval,
            Self::TenantConfigNotFound { .. } => ErrorKind::TenantConfigNotFound,
            Self::HistoryStore(_) | Self::ConfigStore(_) => ErrorKind::Store,
        }
    }
}

impl From<RuntimeError> for EvaluationError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::RequestData(e) => Self::RequestData(e),
            RuntimeError::BusinessRule(message) => Self::BusinessRule(message),
            RuntimeError::DataRetrieval(e) => Self::DataRetrieval(e),
            RuntimeError::Store(e) => Self::HistoryStore(e),
        }
    }
}

/// Error raised while configuring or building the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Global rule configuration rejected
    #[error("Rule configuration error: {0}")]
    RuleConfig(#[from] ConfigError),

    /// Cache or store setup failed
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
