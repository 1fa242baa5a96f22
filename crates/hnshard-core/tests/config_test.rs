//! Tests for configuration loading and validation.

use hnshard_core::config::{defaults, HnShardConfig};
use hnshard_core::errors::ConfigError;

#[test]
fn defaults_are_valid() {
    let config = HnShardConfig::default();
    config.validate().unwrap();
    assert_eq!(config.pool.capacity, defaults::DEFAULT_POOL_CAPACITY);
    assert!(config.search.concurrency >= defaults::MIN_CONCURRENCY);
    assert!(config.search.concurrency <= defaults::MAX_CONCURRENCY);
}

#[test]
fn partial_toml_keeps_other_defaults() {
    let config = HnShardConfig::from_toml_str(
        r#"
        [archive]
        root = "/data/static-shards"

        [pool]
        capacity = 8
        "#,
    )
    .unwrap();
    assert_eq!(config.archive.root.to_str(), Some("/data/static-shards"));
    assert_eq!(config.pool.capacity, 8);
    assert_eq!(config.archive.manifest_file, defaults::DEFAULT_MANIFEST_FILE);
    assert_eq!(config.search.max_limit, defaults::DEFAULT_MAX_LIMIT);
}

#[test]
fn zero_capacity_is_rejected() {
    let err = HnShardConfig::from_toml_str("[pool]\ncapacity = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "pool.capacity"));
}

#[test]
fn default_limit_above_max_is_rejected() {
    let err = HnShardConfig::from_toml_str("[search]\ndefault_limit = 50\nmax_limit = 10\n")
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "search.default_limit"));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = HnShardConfig::from_toml_str("[pool\ncapacity = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn load_reads_file_and_reports_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hnshard.toml");
    std::fs::write(&path, "[search]\nconcurrency = 2\n").unwrap();
    let config = HnShardConfig::load(&path).unwrap();
    assert_eq!(config.search.concurrency, 2);

    let missing = HnShardConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(missing, ConfigError::FileNotFound { .. }));
}
