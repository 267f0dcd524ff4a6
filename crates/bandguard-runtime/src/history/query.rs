//! History query construction
//!
//! Derives the bounded time-window count query from the triggering request:
//! same debtor account, same transaction type, timestamps within
//! `maxQueryRange` milliseconds before the triggering message, and optionally
//! the same tenant.

use crate::error::Result;
use bandguard_core::{RequestDataError, RuleRequest};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Namespace prefixed to account identifiers in the history store
pub const ACCOUNT_NAMESPACE: &str = "accounts/";

/// Namespaced account key used as the filter value
pub fn account_key(account_id: &str) -> String {
    format!("{}{}", ACCOUNT_NAMESPACE, account_id)
}

/// Earliest window start, 0001-01-01T00:00:00Z
///
/// Ranges reaching further back are clamped here so the bound stays within
/// what database timestamp columns accept.
const EARLIEST_START_SECS: i64 = -62_135_596_800;

/// Inclusive time window `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QueryWindow {
    /// Window ending at `end` and spanning `range_ms` backwards
    pub fn ending_at(end: DateTime<Utc>, range_ms: u64) -> Self {
        let earliest =
            DateTime::from_timestamp(EARLIEST_START_SECS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC);
        let start = i64::try_from(range_ms)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .and_then(|range| end.checked_sub_signed(range))
            .map_or(earliest, |start| start.max(earliest));
        Self {
            start: start.min(end),
            end,
        }
    }

    /// Check whether a timestamp falls inside the window
    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        *timestamp >= self.start && *timestamp <= self.end
    }
}

/// Count query over the transaction history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// Namespaced debtor account key
    pub account_key: String,

    /// Transaction type of the triggering message
    pub tx_tp: String,

    /// Tenant constraint, set only for tenant-aware evaluation
    pub tenant_id: Option<String>,

    pub window: QueryWindow,
}

impl HistoryQuery {
    /// Render as parameterized PostgreSQL
    ///
    /// Bind order: account key, transaction type, window start, window end,
    /// then tenant id when present.
    pub fn to_sql(&self, table: &str) -> String {
        let mut sql = format!(
            "SELECT COUNT(*) AS total FROM {} WHERE account_key = $1 AND tx_tp = $2 \
             AND cre_dt_tm >= $3 AND cre_dt_tm <= $4",
            table
        );
        if self.tenant_id.is_some() {
            sql.push_str(" AND tenant_id = $5");
        }
        sql
    }
}

/// Builder for [`HistoryQuery`]
pub struct HistoryQueryBuilder<'a> {
    request: &'a RuleRequest,
    max_query_range: u64,
    tenant_id: Option<&'a str>,
}

impl<'a> HistoryQueryBuilder<'a> {
    /// Create a builder for a request and a window length in milliseconds
    pub fn new(request: &'a RuleRequest, max_query_range: u64) -> Self {
        Self {
            request,
            max_query_range,
            tenant_id: None,
        }
    }

    /// Restrict the query to one tenant
    pub fn with_tenant(mut self, tenant_id: &'a str) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    /// Build the query
    ///
    /// Fails when the request carries no data cache or no debtor account.
    pub fn build(self) -> Result<HistoryQuery> {
        let data_cache = self
            .request
            .data_cache
            .as_ref()
            .ok_or(RequestDataError::MissingDataCache)?;
        let dbtr_acct_id = data_cache
            .dbtr_acct_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(RequestDataError::MissingDebtorAccountId)?;

        let transaction = &self.request.transaction;
        Ok(HistoryQuery {
            account_key: account_key(dbtr_acct_id),
            tx_tp: transaction.tx_tp.clone(),
            tenant_id: self.tenant_id.map(str::to_string),
            window: QueryWindow::ending_at(transaction.cre_dt_tm, self.max_query_range),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeError;
    use bandguard_core::{DataCache, PaymentStatus};

    fn request() -> RuleRequest {
        RuleRequest::new(PaymentStatus::new(
            "msg-1",
            "pacs.002.001.12",
            "ACCC",
            "2024-03-01T10:00:00Z".parse().unwrap(),
        ))
    }

    #[test]
    fn test_build_query() {
        let request = request().with_data_cache(DataCache::for_debtor_account("acct-9"));
        let query = HistoryQueryBuilder::new(&request, 3_600_000).build().unwrap();

        assert_eq!(query.account_key, "accounts/acct-9");
        assert_eq!(query.tx_tp, "pacs.002.001.12");
        assert_eq!(query.tenant_id, None);
        assert_eq!(query.window.end, request.transaction.cre_dt_tm);
        assert_eq!(
            query.window.start,
            "2024-03-01T09:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn test_tenant_constraint() {
        let request = request().with_data_cache(DataCache::for_debtor_account("acct-9"));
        let query = HistoryQueryBuilder::new(&request, 1000)
            .with_tenant("tenant-a")
            .build()
            .unwrap();

        assert_eq!(query.tenant_id.as_deref(), Some("tenant-a"));
        assert!(query.to_sql("transactions").ends_with("AND tenant_id = $5"));
    }

    #[test]
    fn test_missing_data_cache() {
        let request = request();
        let err = HistoryQueryBuilder::new(&request, 1000).build().unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::RequestData(RequestDataError::MissingDataCache)
        ));
    }

    #[test]
    fn test_missing_debtor_account() {
        let request = request().with_data_cache(DataCache::default());
        let err = HistoryQueryBuilder::new(&request, 1000).build().unwrap_err();
        assert_eq!(err.to_string(), "Data Cache does not have required dbtrAcctId");
    }

    #[test]
    fn test_window_bounds_inclusive() {
        let end: DateTime<Utc> = "2024-03-01T10:00:00Z".parse().unwrap();
        let window = QueryWindow::ending_at(end, 60_000);

        assert!(window.contains(&end));
        assert!(window.contains(&"2024-03-01T09:59:00Z".parse().unwrap()));
        assert!(!window.contains(&"2024-03-01T09:58:59Z".parse().unwrap()));
        assert!(!window.contains(&"2024-03-01T10:00:01Z".parse().unwrap()));
    }

    #[test]
    fn test_huge_range_clamps_to_year_one() {
        let end: DateTime<Utc> = "2024-03-01T10:00:00Z".parse().unwrap();
        let year_one: DateTime<Utc> = "0001-01-01T00:00:00Z".parse().unwrap();

        // Overflows the duration arithmetic
        assert_eq!(QueryWindow::ending_at(end, u64::MAX).start, year_one);

        // Representable, but before year one
        let ten_thousand_years = 10_000 * 365 * 86_400_000;
        assert_eq!(QueryWindow::ending_at(end, ten_thousand_years).start, year_one);

        assert!(QueryWindow::ending_at(end, u64::MAX).contains(&end));
    }

    #[test]
    fn test_sql_without_tenant() {
        let request = request().with_data_cache(DataCache::for_debtor_account("acct-9"));
        let sql = HistoryQueryBuilder::new(&request, 1000)
            .build()
            .unwrap()
            .to_sql("transactions");

        assert!(sql.starts_with("SELECT COUNT(*) AS total FROM transactions"));
        assert!(!sql.contains("tenant_id"));
    }
}
