//! Query planner: chooses candidate shards and builds the shard-local predicate.
//!
//! Candidates are ordered newest first (descending sequence), the order
//! in which per-shard work is dispatched. Final ranking never depends on it.

use std::collections::HashSet;

use tracing::debug;

use hnshard_core::models::{Query, ShardDescriptor, ShardId, ShardPredicate};

/// What to search and how.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    /// Shards to query, newest first.
    pub candidates: Vec<ShardDescriptor>,
    /// Shards left out by `max_shards`. They count against completeness.
    pub excluded: Vec<ShardId>,
    /// Shards whose known time coverage lies outside the query's range.
    /// They cannot hold a qualifying item and do not make the result partial.
    pub pruned: usize,
    pub predicate: ShardPredicate,
}

/// Plan a validated query over the catalog's shards (ascending order).
pub fn plan(shards: &[ShardDescriptor], query: &Query) -> QueryPlan {
    let newest_first = shards.iter().rev();
    let take = query.max_shards.unwrap_or(shards.len());

    let mut candidates = Vec::with_capacity(take.min(shards.len()));
    let mut excluded = Vec::new();
    let mut pruned = 0;
    for (rank, shard) in newest_first.enumerate() {
        if rank >= take {
            excluded.push(shard.id.clone());
            continue;
        }
        if let Some(range) = &query.time_range {
            if !shard.may_overlap(range) {
                pruned += 1;
                continue;
            }
        }
        candidates.push(shard.clone());
    }

    debug!(
        candidates = candidates.len(),
        excluded = excluded.len(),
        pruned,
        "query planned"
    );

    QueryPlan {
        candidates,
        excluded,
        pruned,
        predicate: build_predicate(query),
    }
}

/// Trim, ASCII-lowercase, and dedupe the keywords; carry the filters over.
pub fn build_predicate(query: &Query) -> ShardPredicate {
    let mut seen = HashSet::new();
    let terms = query
        .keywords
        .iter()
        .map(|k| k.trim().to_ascii_lowercase())
        .filter(|k| !k.is_empty() && seen.insert(k.clone()))
        .collect();

    ShardPredicate {
        terms,
        min_score: query.min_score,
        item_kind: query.item_kind.clone(),
        time_range: query.time_range,
        limit: usize::try_from(query.limit).unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use hnshard_core::models::TimeRange;

    use super::*;

    fn shard(seq: u64, time_range: Option<TimeRange>) -> ShardDescriptor {
        ShardDescriptor {
            id: format!("shard_{seq}"),
            seq,
            path: PathBuf::from(format!("/archive/shard_{seq}.sqlite.gz")),
            compressed: true,
            size_bytes: 1,
            id_range: None,
            time_range,
            item_count: None,
        }
    }

    fn ids(shards: &[ShardDescriptor]) -> Vec<&str> {
        shards.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn every_shard_is_a_candidate_by_default() {
        let shards = vec![shard(0, None), shard(1, None), shard(2, None)];
        let plan = plan(&shards, &Query::new(["x"], 10));
        assert_eq!(ids(&plan.candidates), ["shard_2", "shard_1", "shard_0"]);
        assert!(plan.excluded.is_empty());
        assert_eq!(plan.pruned, 0);
    }

    #[test]
    fn max_shards_keeps_the_newest() {
        let shards: Vec<_> = (0..5).map(|s| shard(s, None)).collect();
        let plan = plan(&shards, &Query::new(["x"], 10).with_max_shards(2));
        assert_eq!(ids(&plan.candidates), ["shard_4", "shard_3"]);
        assert_eq!(plan.excluded, ["shard_2", "shard_1", "shard_0"]);
    }

    #[test]
    fn time_hint_prunes_only_known_disjoint_shards() {
        let shards = vec![
            shard(0, Some(TimeRange::new(0, 99))),
            shard(1, Some(TimeRange::new(100, 199))),
            shard(2, None),
        ];
        let q = Query::new(["x"], 10).with_time_range(TimeRange::new(150, 300));
        let plan = plan(&shards, &q);
        assert_eq!(ids(&plan.candidates), ["shard_2", "shard_1"]);
        assert_eq!(plan.pruned, 1);
        assert!(plan.excluded.is_empty());
    }

    #[test]
    fn predicate_terms_are_normalized() {
        let q = Query::new([" Keyboard ", "keyboard", "RUST"], 7).with_min_score(3);
        let p = build_predicate(&q);
        assert_eq!(p.terms, ["keyboard", "rust"]);
        assert_eq!(p.min_score, 3);
        assert_eq!(p.limit, 7);
    }
}
