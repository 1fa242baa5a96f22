//! Tests for the hnshard error taxonomy.

use std::collections::HashSet;
use std::path::PathBuf;

use hnshard_core::errors::*;
use hnshard_core::models::{FailedShard, ResultSet};

fn empty_result() -> ResultSet {
    ResultSet {
        items: vec![],
        total_candidates: 0,
        shards_attempted: 0,
        failed_shards: vec![],
        skipped_shards: vec![],
        early_stopped: false,
        partial: true,
        elapsed_ms: 0,
    }
}

#[test]
fn every_error_has_a_code() {
    let errors: Vec<Box<dyn Fn() -> &'static str>> = vec![
        Box::new(|| CatalogError::NoShards { path: PathBuf::from("/x") }.error_code()),
        Box::new(|| ShardError::unavailable("shard_1", "locked").error_code()),
        Box::new(|| ShardError::Closed.error_code()),
        Box::new(|| SearchError::EmptyKeywords.error_code()),
        Box::new(|| SearchError::Cancelled { partial: None }.error_code()),
        Box::new(|| SearchError::AllShardsUnavailable { failed: vec![] }.error_code()),
        Box::new(|| ConfigError::FileNotFound { path: "/tmp".into() }.error_code()),
    ];
    for code in errors {
        assert!(!code().is_empty());
    }
}

#[test]
fn search_error_codes_classify_failures() {
    assert_eq!(SearchError::InvalidLimit { limit: 0 }.error_code(), error_code::INVALID_QUERY);
    assert_eq!(
        SearchError::Cancelled { partial: Some(Box::new(empty_result())) }.error_code(),
        error_code::CANCELLED
    );
    assert_eq!(
        SearchError::AllShardsUnavailable {
            failed: vec![FailedShard { shard_id: "shard_0".into(), reason: "corrupt".into() }],
        }
        .error_code(),
        error_code::ALL_SHARDS_UNAVAILABLE
    );
    let catalog: SearchError = CatalogError::RootMissing { path: PathBuf::from("/nope") }.into();
    assert_eq!(catalog.error_code(), error_code::CATALOG_ERROR);
}

#[test]
fn invalid_input_errors_are_flagged() {
    assert!(SearchError::EmptyKeywords.is_invalid_input());
    assert!(SearchError::NegativeMinScore { min_score: -1 }.is_invalid_input());
    assert!(SearchError::LimitTooLarge { limit: 5000, max: 1000 }.is_invalid_input());
    assert!(!SearchError::Cancelled { partial: None }.is_invalid_input());
    assert!(!SearchError::Shutdown.is_invalid_input());
}

#[test]
fn codes_are_distinct_across_categories() {
    let codes: HashSet<&str> = [
        error_code::CATALOG_ERROR,
        error_code::SHARD_UNAVAILABLE,
        error_code::POOL_CLOSED,
        error_code::INVALID_QUERY,
        error_code::CANCELLED,
        error_code::ALL_SHARDS_UNAVAILABLE,
        error_code::CONFIG_ERROR,
    ]
    .into_iter()
    .collect();
    assert_eq!(codes.len(), 7);
}

#[test]
fn coded_string_prefixes_the_code() {
    let err = ShardError::unavailable("shard_7", "database disk image is malformed");
    assert_eq!(
        err.coded_string(),
        "[SHARD_UNAVAILABLE] shard shard_7 unavailable: database disk image is malformed"
    );
}

#[test]
fn failed_shard_keeps_only_the_reason() {
    let err = ShardError::unavailable("shard_3", "truncated");
    let failed = FailedShard::from_error("shard_3", &err);
    assert_eq!(failed.reason, "truncated");
}

#[test]
fn umbrella_error_wraps_each_subsystem() {
    let err: HnShardError = ConfigError::InvalidValue {
        field: "pool.capacity".into(),
        message: "must be at least 1".into(),
    }
    .into();
    assert_eq!(err.error_code(), error_code::CONFIG_ERROR);
    assert!(err.to_string().contains("pool.capacity"));
}
