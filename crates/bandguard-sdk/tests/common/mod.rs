//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use bandguard_sdk::{
    Band, DataCache, ExitCondition, HistoryQuery, HistoryRows, HistoryStore, PaymentStatus,
    RuleConfig, RuleRequest, RuleResult, TenantRuleConfig,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const RULE_ID: &str = "901@1.0.0";
pub const PACS002: &str = "pacs.002.001.12";
pub const DAY_MS: u64 = 86_400_000;

pub fn now() -> DateTime<Utc> {
    "2024-03-01T10:00:00Z".parse().unwrap()
}

/// Three-band configuration: `< 2`, `[2, 4)`, `>= 4`
pub fn rule_config() -> RuleConfig {
    RuleConfig::new(RULE_ID, "1.0.0")
        .with_bands(vec![
            Band::new(".01", None, Some(2), "Single transaction"),
            Band::new(".02", Some(2), Some(4), "Few transactions"),
            Band::new(".03", Some(4), None, "Many transactions"),
        ])
        .with_exit_conditions(vec![ExitCondition::new(".x00", "Unsuccessful transaction")])
        .with_max_query_range(DAY_MS)
}

pub fn tenant_config(tenant_id: &str) -> TenantRuleConfig {
    TenantRuleConfig::new(tenant_id, rule_config())
}

pub fn request(tx_sts: &str) -> RuleRequest {
    RuleRequest::new(PaymentStatus::new("msg-001", PACS002, tx_sts, now()))
        .with_data_cache(DataCache::for_debtor_account("acct-1"))
}

pub fn tenant_request(tenant_id: &str) -> RuleRequest {
    request("ACCC").with_tenant(tenant_id)
}

pub fn initial_result() -> RuleResult {
    RuleResult::new(RULE_ID, "1.0.0")
}

enum Response {
    Rows(Option<HistoryRows>),
    Fail(String),
}

/// History store returning a fixed response and recording its queries
pub struct ScriptedHistoryStore {
    response: Response,
    calls: AtomicUsize,
    queries: Mutex<Vec<HistoryQuery>>,
}

impl ScriptedHistoryStore {
    fn with_response(response: Response) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Respond with `[[count]]`
    pub fn count(count: u64) -> Self {
        Self::value(json!(count))
    }

    /// Respond with `[[value]]`
    pub fn value(value: Value) -> Self {
        Self::rows(Some(vec![vec![value]]))
    }

    pub fn rows(rows: Option<HistoryRows>) -> Self {
        Self::with_response(Response::Rows(rows))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_response(Response::Fail(message.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<HistoryQuery> {
        self.queries.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl HistoryStore for ScriptedHistoryStore {
    async fn query_history(&self, query: &HistoryQuery) -> anyhow::Result<Option<HistoryRows>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());

        match &self.response {
            Response::Rows(rows) => Ok(rows.clone()),
            Response::Fail(message) => Err(anyhow::anyhow!(message.clone())),
        }
    }
}
