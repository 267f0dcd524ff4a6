//! Direct rule evaluation example
//!
//! This example demonstrates:
//! - Loading a rule configuration from JSON
//! - Recording transaction history in memory
//! - Evaluating payment-status messages against the rule

use bandguard_runtime::{HistoryEvent, InMemoryHistoryStore};
use bandguard_sdk::{
    DataCache, EvaluateOptions, PaymentStatus, RuleConfig, RuleEvaluatorBuilder, RuleRequest,
    RuleResult,
};
use chrono::{Duration, Utc};
use std::sync::Arc;
use std::time::Instant;

const PACS002: &str = "pacs.002.001.12";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Direct Evaluation Example ===\n");

    let config: RuleConfig = serde_json::from_str(include_str!("configs/rule-901.json"))?;
    println!("Loaded rule {} (cfg {})\n", config.id, config.cfg);

    // Three earlier transactions in the last day, one outside the window
    let now = Utc::now();
    let history = Arc::new(InMemoryHistoryStore::with_events(vec![
        HistoryEvent::new("acct-42", PACS002, now - Duration::hours(1)),
        HistoryEvent::new("acct-42", PACS002, now - Duration::hours(5)),
        HistoryEvent::new("acct-42", PACS002, now - Duration::hours(30)),
    ]));

    let evaluator = RuleEvaluatorBuilder::new()
        .with_history_store(history.clone())
        .build()?;

    for (msg_id, status) in [("msg-1", "ACCC"), ("msg-2", "ACCC"), ("msg-3", "RJCT")] {
        let request = RuleRequest::new(PaymentStatus::new(msg_id, PACS002, status, Utc::now()))
            .with_data_cache(DataCache::for_debtor_account("acct-42"));

        let started = Instant::now();
        let mut result = evaluator
            .evaluate(EvaluateOptions {
                request: &request,
                config: &config,
                result: RuleResult::new(&config.id, &config.cfg),
            })
            .await?;
        result.prcg_tm = Some(started.elapsed().as_nanos() as u64);

        println!("{} ({}):", msg_id, status);
        println!("  Sub-rule: {}", result.sub_rule_ref);
        println!("  Reason: {}", result.reason);
        println!("  Count: {:?}", result.indpdnt_varbl);
        println!("  Processing Time: {:?}ns\n", result.prcg_tm);

        // Record the evaluated transaction so the next one sees it
        if request.is_successful() {
            history
                .add_event(HistoryEvent::new("acct-42", PACS002, request.transaction.cre_dt_tm))
                .await;
        }
    }

    Ok(())
}
