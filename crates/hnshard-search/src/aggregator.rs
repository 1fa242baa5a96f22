//! Result aggregator: merge per-shard partials into one ranked, bounded set.
//!
//! Ranking is score descending, then creation time descending, then id
//! ascending. Arrival order never influences the output.

use std::collections::HashSet;

use hnshard_core::models::{FailedShard, Item, ResultSet, ShardId};

use crate::executor::{FanOut, ShardOutcome};

/// Merged items plus the count of distinct candidates seen before truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    pub items: Vec<Item>,
    pub total_candidates: usize,
}

/// Dedupe by id (first occurrence wins), rank, truncate to `limit`.
pub fn merge_ranked<I>(partials: I, limit: usize) -> Merged
where
    I: IntoIterator<Item = Vec<Item>>,
{
    let mut seen = HashSet::new();
    let mut items: Vec<Item> = partials
        .into_iter()
        .flatten()
        .filter(|item| seen.insert(item.id))
        .collect();
    let total_candidates = items.len();

    items.sort_by(Item::rank_cmp);
    items.truncate(limit);

    Merged {
        items,
        total_candidates,
    }
}

/// Build the caller-facing result from a fan-out.
///
/// `excluded` lists shards the planner left out; they, failed shards, and
/// skipped shards all make the result partial.
pub fn aggregate(fan_out: FanOut, excluded: Vec<ShardId>, limit: usize) -> ResultSet {
    let mut partials = Vec::with_capacity(fan_out.outcomes.len());
    let mut failed_shards: Vec<FailedShard> = Vec::new();
    let mut skipped_shards = excluded;
    let mut shards_attempted = 0;

    for outcome in fan_out.outcomes {
        match outcome {
            ShardOutcome::Completed { items, .. } => {
                shards_attempted += 1;
                partials.push(items);
            }
            ShardOutcome::Failed(failed) => {
                shards_attempted += 1;
                failed_shards.push(failed);
            }
            ShardOutcome::Skipped { shard_id, .. } => skipped_shards.push(shard_id),
        }
    }

    let merged = merge_ranked(partials, limit);
    let partial = !failed_shards.is_empty() || !skipped_shards.is_empty();

    ResultSet {
        items: merged.items,
        total_candidates: merged.total_candidates,
        shards_attempted,
        failed_shards,
        skipped_shards,
        early_stopped: fan_out.early_stopped,
        partial,
        elapsed_ms: 0,
    }
}
