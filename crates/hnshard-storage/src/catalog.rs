//! ShardCatalog: discovers `shard_*.sqlite[.gz]` files under the archive root.
//!
//! The scan runs once per catalog; later calls return the cached list.
//! No connection is opened here, only file metadata is recorded.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::{debug, info};

use hnshard_core::config::ArchiveConfig;
use hnshard_core::constants::{SHARD_EXT_GZIP, SHARD_EXT_PLAIN, SHARD_FILE_PREFIX};
use hnshard_core::errors::CatalogError;
use hnshard_core::models::{IdRange, ShardDescriptor};

use crate::manifest;

/// What a shard file name encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedShardName {
    pub seq: u64,
    pub id_range: Option<IdRange>,
    pub compressed: bool,
}

/// Parse `shard_<seq>[_<idlo>-<idhi>].sqlite[.gz]`.
pub fn parse_shard_file_name(name: &str) -> Option<ParsedShardName> {
    let rest = name.strip_prefix(SHARD_FILE_PREFIX)?;
    let (stem, compressed) = if let Some(stem) = rest.strip_suffix(SHARD_EXT_GZIP) {
        (stem, true)
    } else {
        (rest.strip_suffix(SHARD_EXT_PLAIN)?, false)
    };

    let (seq_part, range_part) = match stem.split_once('_') {
        Some((seq, range)) => (seq, Some(range)),
        None => (stem, None),
    };
    if seq_part.is_empty() || !seq_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let seq = seq_part.parse().ok()?;

    let id_range = match range_part {
        Some(range) => {
            let (lo, hi) = range.split_once('-')?;
            Some(IdRange::new(lo.parse().ok()?, hi.parse().ok()?))
        }
        None => None,
    };

    Some(ParsedShardName {
        seq,
        id_range,
        compressed,
    })
}

/// Shard id for a file name: the name without its SQLite extension.
fn shard_id_for(name: &str, compressed: bool) -> String {
    let ext = if compressed { SHARD_EXT_GZIP } else { SHARD_EXT_PLAIN };
    name.strip_suffix(ext).unwrap_or(name).to_string()
}

/// Enumerates the shards of one archive root.
pub struct ShardCatalog {
    root: PathBuf,
    manifest_path: PathBuf,
    shards: OnceLock<Arc<Vec<ShardDescriptor>>>,
}

impl ShardCatalog {
    pub fn new(config: &ArchiveConfig) -> Self {
        Self {
            root: config.root.clone(),
            manifest_path: config.root.join(&config.manifest_file),
            shards: OnceLock::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ordered shard descriptors (ascending sequence = historical append
    /// order). Scans on first call; a failed scan is not cached.
    pub fn list_shards(&self) -> Result<Arc<Vec<ShardDescriptor>>, CatalogError> {
        if let Some(shards) = self.shards.get() {
            return Ok(Arc::clone(shards));
        }
        let scanned = Arc::new(self.scan()?);
        // A concurrent first call may have won the race; both scans agree.
        Ok(Arc::clone(self.shards.get_or_init(|| scanned)))
    }

    /// Look up one shard by id.
    pub fn get(&self, shard_id: &str) -> Result<Option<ShardDescriptor>, CatalogError> {
        Ok(self.list_shards()?.iter().find(|s| s.id == shard_id).cloned())
    }

    fn scan(&self) -> Result<Vec<ShardDescriptor>, CatalogError> {
        let meta = std::fs::metadata(&self.root).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CatalogError::RootMissing {
                path: self.root.clone(),
            },
            _ => CatalogError::Io {
                path: self.root.clone(),
                source: e,
            },
        })?;
        if !meta.is_dir() {
            return Err(CatalogError::RootNotDirectory {
                path: self.root.clone(),
            });
        }

        let entries = std::fs::read_dir(&self.root).map_err(|e| CatalogError::Io {
            path: self.root.clone(),
            source: e,
        })?;

        // Keyed by shard id; a plain shard shadows its gzipped twin.
        let mut found: BTreeMap<String, ShardDescriptor> = BTreeMap::new();
        for entry in entries {
            let entry = entry.map_err(|e| CatalogError::Io {
                path: self.root.clone(),
                source: e,
            })?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(parsed) = parse_shard_file_name(name) else {
                continue;
            };
            let Ok(file_meta) = entry.metadata() else {
                continue;
            };
            if !file_meta.is_file() {
                continue;
            }

            let id = shard_id_for(name, parsed.compressed);
            if let Some(existing) = found.get(&id) {
                if !existing.compressed {
                    debug!(shard_id = %id, file = name, "plain shard already present, skipping");
                    continue;
                }
            }
            debug!(shard_id = %id, seq = parsed.seq, bytes = file_meta.len(), "discovered shard");
            found.insert(
                id.clone(),
                ShardDescriptor {
                    id,
                    seq: parsed.seq,
                    path: path.clone(),
                    compressed: parsed.compressed,
                    size_bytes: file_meta.len(),
                    id_range: parsed.id_range,
                    time_range: None,
                    item_count: None,
                },
            );
        }

        if found.is_empty() {
            return Err(CatalogError::NoShards {
                path: self.root.clone(),
            });
        }

        let mut shards: Vec<ShardDescriptor> = found.into_values().collect();
        shards.sort_by(|a, b| a.seq.cmp(&b.seq).then_with(|| a.id.cmp(&b.id)));

        let enriched = manifest::load(&self.manifest_path)
            .map(|m| manifest::apply(&m, &mut shards))
            .unwrap_or(0);

        info!(
            root = %self.root.display(),
            shards = shards.len(),
            with_metadata = enriched,
            "shard catalog built"
        );
        Ok(shards)
    }
}
