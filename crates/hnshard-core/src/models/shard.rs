use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::item::ItemId;

/// Shard identifier, derived from the shard's file name (e.g. `shard_12`).
pub type ShardId = String;

/// Inclusive range of item ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRange {
    pub lo: ItemId,
    pub hi: ItemId,
}

impl IdRange {
    pub fn new(lo: ItemId, hi: ItemId) -> Self {
        Self {
            lo: lo.min(hi),
            hi: lo.max(hi),
        }
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.lo <= id && id <= self.hi
    }
}

/// Inclusive range of unix timestamps (seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, time: i64) -> bool {
        self.start <= time && time <= self.end
    }

    /// True if the two inclusive ranges share at least one instant.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// File-level metadata for one discovered shard. Immutable once discovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardDescriptor {
    pub id: ShardId,
    /// Position in historical append order (from the file name).
    pub seq: u64,
    pub path: PathBuf,
    /// True for `.sqlite.gz` shards that must be decompressed before opening.
    pub compressed: bool,
    pub size_bytes: u64,
    /// Best-effort id coverage, from the file name or the manifest.
    pub id_range: Option<IdRange>,
    /// Best-effort time coverage, from the manifest.
    pub time_range: Option<TimeRange>,
    /// Item count estimate, from the manifest.
    pub item_count: Option<u64>,
}

impl ShardDescriptor {
    /// False only when the shard's known id range excludes `id`.
    pub fn may_contain_id(&self, id: ItemId) -> bool {
        self.id_range.map_or(true, |r| r.contains(id))
    }

    /// False only when the shard's known time range lies fully outside `range`.
    pub fn may_overlap(&self, range: &TimeRange) -> bool {
        self.time_range.map_or(true, |r| r.overlaps(range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(time_range: Option<TimeRange>, id_range: Option<IdRange>) -> ShardDescriptor {
        ShardDescriptor {
            id: "shard_0".to_string(),
            seq: 0,
            path: PathBuf::from("shard_0.sqlite"),
            compressed: false,
            size_bytes: 0,
            id_range,
            time_range,
            item_count: None,
        }
    }

    #[test]
    fn unknown_ranges_never_prune() {
        let d = descriptor(None, None);
        assert!(d.may_contain_id(42));
        assert!(d.may_overlap(&TimeRange::new(0, 1)));
    }

    #[test]
    fn range_edges_are_inclusive() {
        let d = descriptor(Some(TimeRange::new(100, 200)), Some(IdRange::new(10, 20)));
        assert!(d.may_overlap(&TimeRange::new(200, 300)));
        assert!(d.may_overlap(&TimeRange::new(0, 100)));
        assert!(!d.may_overlap(&TimeRange::new(201, 300)));
        assert!(d.may_contain_id(10));
        assert!(d.may_contain_id(20));
        assert!(!d.may_contain_id(21));
    }

    #[test]
    fn id_range_normalizes_order() {
        let r = IdRange::new(9, 3);
        assert_eq!((r.lo, r.hi), (3, 9));
    }
}
