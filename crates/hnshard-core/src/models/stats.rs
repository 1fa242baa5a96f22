use serde::{Deserialize, Serialize};

use super::shard::{IdRange, TimeRange};

/// Archive-wide statistics for controller context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveStats {
    pub total_shards: usize,
    pub compressed_shards: usize,
    pub total_bytes: u64,
    /// Union of known shard id ranges.
    pub id_bounds: Option<IdRange>,
    /// Union of known shard time ranges.
    pub time_bounds: Option<TimeRange>,
    /// Sum of manifest item counts; `None` when no shard reports one.
    pub estimated_items: Option<u64>,
    pub pool: PoolStats,
}

/// Snapshot of the shard pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolStats {
    pub capacity: usize,
    pub open_connections: usize,
    pub idle: usize,
    pub checked_out: usize,
    pub evictions: u64,
}
