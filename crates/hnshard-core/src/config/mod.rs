//! Configuration for the archive, the shard pool, and the search pipeline.
//!
//! Every struct is `#[serde(default)]`, so a TOML file only has to name the
//! values it overrides.

pub mod archive_config;
pub mod defaults;
pub mod pool_config;
pub mod search_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use archive_config::ArchiveConfig;
pub use pool_config::PoolConfig;
pub use search_config::SearchConfig;

use crate::errors::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HnShardConfig {
    pub archive: ArchiveConfig,
    pub pool: PoolConfig,
    pub search: SearchConfig,
}

impl HnShardConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<inline>")
    }

    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Config with defaults everywhere except the archive root.
    pub fn for_root(root: impl Into<std::path::PathBuf>) -> Self {
        let mut config = Self::default();
        config.archive.root = root.into();
        config
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool.capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pool.capacity".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.search.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.concurrency".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.search.max_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.max_limit".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.search.default_limit == 0 || self.search.default_limit > self.search.max_limit {
            return Err(ConfigError::InvalidValue {
                field: "search.default_limit".to_string(),
                message: format!("must be within 1..={}", self.search.max_limit),
            });
        }
        if self.archive.manifest_file.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "archive.manifest_file".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
