use serde::{Deserialize, Serialize};

use super::defaults;

/// Shard pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum number of shard accessors alive at once (open or checked out).
    pub capacity: usize,
    /// SQLite busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
    /// Page cache size per connection (negative = KB).
    pub cache_size: i64,
    /// Memory-mapped I/O size in bytes per connection.
    pub mmap_size: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::DEFAULT_POOL_CAPACITY,
            busy_timeout_ms: defaults::DEFAULT_BUSY_TIMEOUT_MS,
            cache_size: defaults::DEFAULT_CACHE_SIZE,
            mmap_size: defaults::DEFAULT_MMAP_SIZE,
        }
    }
}
