use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Archive layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Directory holding the `shard_*.sqlite[.gz]` files.
    pub root: PathBuf,
    /// Sidecar manifest file name, relative to `root`.
    pub manifest_file: String,
    /// Where gzipped shards are decompressed. `None` = private temp dir.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(defaults::DEFAULT_ARCHIVE_ROOT),
            manifest_file: defaults::DEFAULT_MANIFEST_FILE.to_string(),
            scratch_dir: None,
        }
    }
}
