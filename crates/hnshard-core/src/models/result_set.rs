use serde::{Deserialize, Serialize};

use super::item::Item;
use super::shard::ShardId;
use crate::errors::ShardError;

/// One shard that could not be searched, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedShard {
    pub shard_id: ShardId,
    pub reason: String,
}

impl FailedShard {
    pub fn from_error(shard_id: impl Into<ShardId>, err: &ShardError) -> Self {
        let reason = match err {
            ShardError::Unavailable { reason, .. } => reason.clone(),
            other => other.to_string(),
        };
        Self {
            shard_id: shard_id.into(),
            reason,
        }
    }
}

/// Ranked, deduplicated, limit-bounded search result plus completeness flags.
///
/// `partial` is true whenever any candidate shard failed or was skipped;
/// a complete result has attempted every shard in the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<Item>,
    /// Distinct matches returned by the shards before truncation. Each shard
    /// returns at most `limit` rows, so this is a lower bound on the
    /// archive-wide match count, not the count itself.
    pub total_candidates: usize,
    pub shards_attempted: usize,
    pub failed_shards: Vec<FailedShard>,
    /// Shards excluded by `max_shards`, early-stop, or cancellation.
    pub skipped_shards: Vec<ShardId>,
    pub early_stopped: bool,
    pub partial: bool,
    pub elapsed_ms: u64,
}

impl ResultSet {
    pub fn is_complete(&self) -> bool {
        !self.partial
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> Vec<super::item::ItemId> {
        self.items.iter().map(|i| i.id).collect()
    }

    pub fn failed_shard_ids(&self) -> Vec<&str> {
        self.failed_shards.iter().map(|f| f.shard_id.as_str()).collect()
    }
}
