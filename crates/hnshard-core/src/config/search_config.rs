use serde::{Deserialize, Serialize};

use super::defaults;

/// Search subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of fan-out worker threads.
    pub concurrency: usize,
    /// Limit applied by callers that do not pick one.
    pub default_limit: usize,
    /// Largest limit a query may request.
    pub max_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            concurrency: defaults::default_concurrency(),
            default_limit: defaults::DEFAULT_LIMIT,
            max_limit: defaults::DEFAULT_MAX_LIMIT,
        }
    }
}
