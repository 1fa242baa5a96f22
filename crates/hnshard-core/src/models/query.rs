use serde::{Deserialize, Serialize};

use super::item::ItemKind;
use super::shard::TimeRange;

/// Caller-supplied search request. Built fresh per call and passed by
/// reference; the engine never mutates it.
///
/// Fields are deliberately loose (`i64` limit and score) so that out-of-range
/// caller input reaches validation instead of failing at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// OR-matched keyword terms.
    pub keywords: Vec<String>,
    /// Inclusive minimum score; 0 means no filter.
    pub min_score: i64,
    /// Maximum number of items returned.
    pub limit: i64,
    #[serde(default)]
    pub item_kind: Option<ItemKind>,
    /// Restricts matches to this creation-time window and lets the planner
    /// prune shards whose known coverage lies outside it.
    #[serde(default)]
    pub time_range: Option<TimeRange>,
    /// Search only the newest N shards.
    #[serde(default)]
    pub max_shards: Option<usize>,
    /// Allow the executor to skip unstarted shards once `limit` matches are in.
    #[serde(default)]
    pub allow_early_stop: bool,
    /// Return whatever was aggregated when the search is cancelled.
    #[serde(default)]
    pub partial_on_cancel: bool,
}

impl Query {
    pub fn new<I, S>(keywords: I, limit: i64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            min_score: 0,
            limit,
            item_kind: None,
            time_range: None,
            max_shards: None,
            allow_early_stop: false,
            partial_on_cancel: false,
        }
    }

    pub fn with_min_score(mut self, min_score: i64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_item_kind(mut self, kind: ItemKind) -> Self {
        self.item_kind = Some(kind);
        self
    }

    pub fn with_time_range(mut self, range: TimeRange) -> Self {
        self.time_range = Some(range);
        self
    }

    pub fn with_max_shards(mut self, max_shards: usize) -> Self {
        self.max_shards = Some(max_shards);
        self
    }

    pub fn with_early_stop(mut self, allow: bool) -> Self {
        self.allow_early_stop = allow;
        self
    }

    pub fn with_partial_on_cancel(mut self, partial: bool) -> Self {
        self.partial_on_cancel = partial;
        self
    }
}
