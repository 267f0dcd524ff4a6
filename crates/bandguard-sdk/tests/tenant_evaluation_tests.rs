//! Tenant-resolved evaluation tests

mod common;

use bandguard_repository::{CacheConfig, MemoryConfigStore};
use bandguard_sdk::{
    evaluate_for_tenant_positional, ErrorKind, EvaluationError, RuleEvaluator,
    RuleEvaluatorBuilder, TenantConfigCache, TenantEvaluateOptions,
};
use common::*;
use std::sync::Arc;
use std::time::Duration;

struct Fixture {
    history: Arc<ScriptedHistoryStore>,
    configs: Arc<MemoryConfigStore>,
    evaluator: RuleEvaluator,
}

fn fixture(count: u64) -> Fixture {
    let history = Arc::new(ScriptedHistoryStore::count(count));
    let configs = Arc::new(MemoryConfigStore::with_configs(vec![
        tenant_config("tenant-a"),
        tenant_config("tenant-b"),
    ]));
    let evaluator = RuleEvaluatorBuilder::new()
        .with_history_store(history.clone())
        .with_config_store(configs.clone())
        .build()
        .unwrap();
    Fixture {
        history,
        configs,
        evaluator,
    }
}

fn options<'a>(
    request: &'a bandguard_sdk::RuleRequest,
    cache: Option<&'a TenantConfigCache>,
) -> TenantEvaluateOptions<'a> {
    TenantEvaluateOptions {
        request,
        rule_id: RULE_ID,
        result: initial_result(),
        cache,
    }
}

#[tokio::test]
async fn test_resolves_and_classifies() {
    let f = fixture(2);
    let request = tenant_request("tenant-a");

    let result = f.evaluator.evaluate_for_tenant(options(&request, None)).await.unwrap();

    assert_eq!(result.sub_rule_ref, ".02");
    assert_eq!(result.indpdnt_varbl, Some(2));
    assert_eq!(f.configs.query_count(), 1);
}

#[tokio::test]
async fn test_history_query_is_tenant_scoped() {
    let f = fixture(1);
    let request = tenant_request("tenant-b");

    f.evaluator.evaluate_for_tenant(options(&request, None)).await.unwrap();

    let query = f.history.last_query().unwrap();
    assert_eq!(query.tenant_id.as_deref(), Some("tenant-b"));
    assert_eq!(query.account_key, "accounts/acct-1");
}

#[tokio::test]
async fn test_second_evaluation_is_served_from_cache() {
    let f = fixture(1);
    let request = tenant_request("tenant-a");

    f.evaluator.evaluate_for_tenant(options(&request, None)).await.unwrap();
    f.evaluator.evaluate_for_tenant(options(&request, None)).await.unwrap();

    assert_eq!(f.configs.query_count(), 1);
    assert_eq!(f.history.calls(), 2);
    let stats = f.evaluator.default_cache().unwrap().stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn test_missing_tenant_fails_before_any_io() {
    let f = fixture(1);

    for tenant in [None, Some(""), Some("   ")] {
        let mut request = request("ACCC");
        request.tenant_id = tenant.map(str::to_string);

        let err = f
            .evaluator
            .evaluate_for_tenant(options(&request, None))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestData);
        assert_eq!(
            err.to_string(),
            "Tenant ID is required for tenant-aware rule evaluation"
        );
    }

    assert_eq!(f.configs.query_count(), 0);
    assert_eq!(f.history.calls(), 0);
}

#[tokio::test]
async fn test_unknown_tenant_is_not_found() {
    let f = fixture(1);
    let request = tenant_request("tenant-z");

    let err = f
        .evaluator
        .evaluate_for_tenant(options(&request, None))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TenantConfigNotFound);
    assert_eq!(
        err.to_string(),
        "No configuration found for tenant tenant-z, rule 901@1.0.0"
    );
    assert_eq!(f.history.calls(), 0);
}

#[tokio::test]
async fn test_config_store_error_propagates() {
    let f = fixture(1);
    f.configs.fail_queries(true);
    let request = tenant_request("tenant-a");

    let err = f
        .evaluator
        .evaluate_for_tenant(options(&request, None))
        .await
        .unwrap_err();

    assert!(matches!(err, EvaluationError::ConfigStore(_)));
    assert_eq!(err.kind(), ErrorKind::Store);
    assert_eq!(f.history.calls(), 0);
}

#[tokio::test]
async fn test_tenant_config_errors_surface_as_configuration() {
    let mut broken = tenant_config("tenant-c");
    broken.rule.config.parameters = None;
    let history = Arc::new(ScriptedHistoryStore::count(1));
    let evaluator = RuleEvaluatorBuilder::new()
        .with_history_store(history.clone())
        .with_config_store(Arc::new(MemoryConfigStore::with_configs(vec![broken])))
        .build()
        .unwrap();
    let request = tenant_request("tenant-c");

    let err = evaluator
        .evaluate_for_tenant(options(&request, None))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid config provided - parameters not provided"
    );
    assert_eq!(history.calls(), 0);
}

#[tokio::test]
async fn test_unsuccessful_tenant_transaction_exits() {
    let f = fixture(3);
    let request = request("RJCT").with_tenant("tenant-a");

    let result = f.evaluator.evaluate_for_tenant(options(&request, None)).await.unwrap();
    assert_eq!(result.sub_rule_ref, ".x00");
    assert_eq!(f.history.calls(), 0);
}

#[tokio::test]
async fn test_without_config_store_default_cache_is_unavailable() {
    let evaluator = RuleEvaluator::new(Arc::new(ScriptedHistoryStore::count(1)));
    let request = tenant_request("tenant-a");

    let err = evaluator
        .evaluate_for_tenant(options(&request, None))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn test_supplied_cache_takes_precedence() {
    let f = fixture(1);
    let other_store = Arc::new(MemoryConfigStore::with_configs(vec![tenant_config("tenant-x")]));
    let cache = TenantConfigCache::new(other_store.clone()).unwrap();
    let request = tenant_request("tenant-x");

    let result = f
        .evaluator
        .evaluate_for_tenant(options(&request, Some(&cache)))
        .await
        .unwrap();

    assert_eq!(result.sub_rule_ref, ".01");
    assert_eq!(other_store.query_count(), 1);
    assert_eq!(f.configs.query_count(), 0);
}

#[tokio::test]
async fn test_invalidate_forces_fresh_lookup() {
    let f = fixture(1);
    let request = tenant_request("tenant-a");
    let cache = f.evaluator.default_cache().unwrap();

    f.evaluator.evaluate_for_tenant(options(&request, None)).await.unwrap();
    assert!(cache.invalidate("tenant-a", RULE_ID));
    f.evaluator.evaluate_for_tenant(options(&request, None)).await.unwrap();

    assert_eq!(f.configs.query_count(), 2);
}

#[tokio::test]
async fn test_clear_tenant_keeps_other_tenants() {
    let f = fixture(1);
    let cache = f.evaluator.default_cache().unwrap();
    for tenant in ["tenant-a", "tenant-b"] {
        let request = tenant_request(tenant);
        f.evaluator.evaluate_for_tenant(options(&request, None)).await.unwrap();
    }

    assert_eq!(cache.clear_tenant("tenant-a"), 1);

    let request = tenant_request("tenant-b");
    f.evaluator.evaluate_for_tenant(options(&request, None)).await.unwrap();
    assert_eq!(f.configs.query_count(), 2);
}

#[tokio::test]
async fn test_stored_config_is_used_without_store_query() {
    let f = fixture(5);
    let cache = f.evaluator.default_cache().unwrap();

    let mut updated = tenant_config("tenant-a");
    updated.rule.config.bands = Some(vec![bandguard_sdk::Band::new(".09", None, None, "All")]);
    cache.store(updated).await.unwrap();

    let request = tenant_request("tenant-a");
    let result = f.evaluator.evaluate_for_tenant(options(&request, None)).await.unwrap();

    assert_eq!(result.sub_rule_ref, ".09");
    assert_eq!(f.configs.query_count(), 0);
    assert_eq!(f.configs.write_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_expired_entry_is_reloaded() {
    let history = Arc::new(ScriptedHistoryStore::count(1));
    let configs = Arc::new(MemoryConfigStore::with_configs(vec![tenant_config("tenant-a")]));
    let cache = TenantConfigCache::with_config(
        configs.clone(),
        CacheConfig::new().with_ttl(Duration::from_secs(10)),
    )
    .unwrap();
    let evaluator = RuleEvaluatorBuilder::new()
        .with_history_store(history)
        .with_cache(cache)
        .build()
        .unwrap();
    let request = tenant_request("tenant-a");

    evaluator.evaluate_for_tenant(options(&request, None)).await.unwrap();
    tokio::time::advance(Duration::from_secs(11)).await;
    evaluator.evaluate_for_tenant(options(&request, None)).await.unwrap();

    assert_eq!(configs.query_count(), 2);
}

#[tokio::test]
async fn test_positional_adapter_matches_canonical_call() {
    let f = fixture(3);
    let request = tenant_request("tenant-a");

    let canonical = f.evaluator.evaluate_for_tenant(options(&request, None)).await.unwrap();
    let positional =
        evaluate_for_tenant_positional(&f.evaluator, &request, initial_result(), RULE_ID, None)
            .await
            .unwrap();

    assert_eq!(canonical, positional);
}
