//! Triggering message types
//!
//! A [`RuleRequest`] wraps the payment-status message that triggered the rule,
//! the precomputed identifiers of the [`DataCache`], and the owning tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status code of an accepted and settled transaction
pub const SUCCESSFUL_STATUS: &str = "ACCC";

/// Rule evaluation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRequest {
    /// The payment-status message being evaluated
    pub transaction: PaymentStatus,

    /// Identifiers precomputed upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_cache: Option<DataCache>,

    /// Owning tenant; required for tenant-aware evaluation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

/// Payment-status message fields the rule consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    /// Message identifier, also used as the log correlation id
    pub msg_id: String,

    /// Transaction type
    pub tx_tp: String,

    /// Transaction status code
    pub tx_sts: String,

    /// Creation timestamp
    pub cre_dt_tm: DateTime<Utc>,
}

/// Side-channel identifiers resolved before the rule runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCache {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dbtr_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dbtr_acct_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdtr_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdtr_acct_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instd_amt: Option<InstructedAmount>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cre_dt_tm: Option<DateTime<Utc>>,
}

/// Amount and currency of the instructed payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructedAmount {
    pub amt: f64,
    pub ccy: String,
}

impl RuleRequest {
    /// Create a request without data cache or tenant
    pub fn new(transaction: PaymentStatus) -> Self {
        Self {
            transaction,
            data_cache: None,
            tenant_id: None,
        }
    }

    /// Set the data cache
    pub fn with_data_cache(mut self, data_cache: DataCache) -> Self {
        self.data_cache = Some(data_cache);
        self
    }

    /// Set the tenant
    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Correlation id for logging
    pub fn msg_id(&self) -> &str {
        &self.transaction.msg_id
    }

    /// Whether the triggering transaction was accepted and settled
    pub fn is_successful(&self) -> bool {
        self.transaction.tx_sts == SUCCESSFUL_STATUS
    }

    /// Tenant identifier exactly as given; blank values count as absent
    pub fn tenant(&self) -> Option<&str> {
        self.tenant_id
            .as_deref()
            .filter(|tenant| !tenant.trim().is_empty())
    }
}

impl PaymentStatus {
    pub fn new(
        msg_id: impl Into<String>,
        tx_tp: impl Into<String>,
        tx_sts: impl Into<String>,
        cre_dt_tm: DateTime<Utc>,
    ) -> Self {
        Self {
            msg_id: msg_id.into(),
            tx_tp: tx_tp.into(),
            tx_sts: tx_sts.into(),
            cre_dt_tm,
        }
    }
}

impl DataCache {
    /// Create a data cache holding only the debtor account
    pub fn for_debtor_account(dbtr_acct_id: impl Into<String>) -> Self {
        Self {
            dbtr_acct_id: Some(dbtr_acct_id.into()),
            ..Default::default()
        }
    }
}
