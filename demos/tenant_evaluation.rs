//! Tenant-aware rule evaluation example
//!
//! This example demonstrates:
//! - Resolving rule configurations per tenant from a file system store
//! - Serving repeated lookups from the tenant configuration cache
//! - Invalidating a tenant after its configuration changed

use bandguard_repository::FileSystemConfigStore;
use bandguard_runtime::{HistoryEvent, InMemoryHistoryStore};
use bandguard_sdk::{
    DataCache, EngineConfig, PaymentStatus, RuleEvaluatorBuilder, RuleRequest, RuleResult,
    TenantEvaluateOptions,
};
use chrono::{Duration, Utc};
use std::path::Path;
use std::sync::Arc;

const PACS002: &str = "pacs.002.001.12";
const RULE_ID: &str = "901@1.0.0";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Tenant Evaluation Example ===\n");

    let engine_config = EngineConfig::load()?;
    println!(
        "Cache TTL: {}ms, sweep every {}ms\n",
        engine_config.cache.ttl_ms, engine_config.cache.sweep_interval_ms
    );

    let config_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/configs");
    let config_store = Arc::new(FileSystemConfigStore::new(config_root)?);

    let now = Utc::now();
    let history = Arc::new(InMemoryHistoryStore::with_events(vec![
        HistoryEvent::new("acct-7", PACS002, now - Duration::minutes(10)).with_tenant("tenant-a"),
        HistoryEvent::new("acct-7", PACS002, now - Duration::minutes(20)).with_tenant("tenant-a"),
        HistoryEvent::new("acct-7", PACS002, now - Duration::minutes(30)).with_tenant("tenant-a"),
        // Same account under another tenant is not counted
        HistoryEvent::new("acct-7", PACS002, now - Duration::minutes(5)).with_tenant("tenant-b"),
    ]));

    let evaluator = RuleEvaluatorBuilder::new()
        .with_history_store(history)
        .with_config_store(config_store)
        .with_engine_config(engine_config)
        .build()?;

    for tenant in ["tenant-a", "tenant-a", "tenant-b"] {
        let request = RuleRequest::new(PaymentStatus::new("msg-1", PACS002, "ACCC", Utc::now()))
            .with_data_cache(DataCache::for_debtor_account("acct-7"))
            .with_tenant(tenant);

        let outcome = evaluator
            .evaluate_for_tenant(TenantEvaluateOptions {
                request: &request,
                rule_id: RULE_ID,
                result: RuleResult::new(RULE_ID, "1.0.0"),
                cache: None,
            })
            .await;

        match outcome {
            Ok(result) => println!(
                "{}: {} - {} (count {:?})",
                tenant, result.sub_rule_ref, result.reason, result.indpdnt_varbl
            ),
            Err(err) => println!("{}: {:?} error - {}", tenant, err.kind(), err),
        }
    }

    let cache = evaluator.default_cache()?;
    let stats = cache.stats();
    println!("\nCache Statistics:");
    println!("  Entries: {}", stats.size);
    println!("  Hits: {}, Misses: {}", stats.hits, stats.misses);
    println!("  Hit Rate: {:.2}%", stats.hit_rate() * 100.0);
    println!("  Memory: {} bytes", stats.memory_bytes());

    let removed = cache.clear_tenant("tenant-a");
    println!("\nCleared {} cached configuration(s) for tenant-a", removed);

    Ok(())
}
