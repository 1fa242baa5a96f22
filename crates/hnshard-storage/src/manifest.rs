//! Optional sidecar manifest carrying per-shard id/time coverage.
//!
//! The manifest is best-effort metadata used only for pruning: a missing file
//! means "no metadata", a malformed one is logged and ignored.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use hnshard_core::models::{IdRange, ShardDescriptor, TimeRange};

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub shards: Vec<ManifestEntry>,
}

/// One shard's coverage as recorded by the archive exporter.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    #[serde(default)]
    pub sid: Option<u64>,
    pub file: String,
    #[serde(default)]
    pub id_lo: Option<i64>,
    #[serde(default)]
    pub id_hi: Option<i64>,
    #[serde(default)]
    pub tmin: Option<i64>,
    #[serde(default)]
    pub tmax: Option<i64>,
    #[serde(default)]
    pub count: Option<u64>,
}

impl ManifestEntry {
    fn id_range(&self) -> Option<IdRange> {
        Some(IdRange::new(self.id_lo?, self.id_hi?))
    }

    fn time_range(&self) -> Option<TimeRange> {
        let (start, end) = (self.tmin?, self.tmax?);
        (start <= end).then(|| TimeRange::new(start, end))
    }
}

/// Read `path`. Returns `None` when it is absent or cannot be parsed.
pub fn load(path: &Path) -> Option<Manifest> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no shard manifest");
            return None;
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable shard manifest, ignoring");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed shard manifest, ignoring");
            None
        }
    }
}

/// Copy manifest coverage onto the matching descriptors (by file name).
/// Returns how many descriptors were enriched.
pub fn apply(manifest: &Manifest, shards: &mut [ShardDescriptor]) -> usize {
    let by_file: HashMap<&str, &ManifestEntry> =
        manifest.shards.iter().map(|e| (e.file.as_str(), e)).collect();

    let mut applied = 0;
    for shard in shards.iter_mut() {
        let Some(name) = shard.path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(entry) = by_file.get(name) else {
            continue;
        };
        if let Some(range) = entry.id_range() {
            shard.id_range = Some(range);
        }
        shard.time_range = entry.time_range();
        shard.item_count = entry.count;
        applied += 1;
    }
    applied
}
