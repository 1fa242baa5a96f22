use serde::{Deserialize, Serialize};

use super::item::{Item, ItemKind};
use super::shard::TimeRange;

/// Shard-local filter built by the planner from a validated query.
///
/// An item qualifies iff any term is a case-insensitive substring of its
/// title or text, its score is at least `min_score`, and the optional kind
/// and time filters hold. Terms are stored lowercased and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardPredicate {
    pub terms: Vec<String>,
    pub min_score: i64,
    pub item_kind: Option<ItemKind>,
    pub time_range: Option<TimeRange>,
    /// Per-shard row cap. Under the total ranking order the global top-N
    /// lies inside the union of every shard's top-N.
    pub limit: usize,
}

impl ShardPredicate {
    /// In-process evaluation with the same semantics as the SQL translation
    /// (ASCII case folding, like SQLite's `LIKE`).
    pub fn matches(&self, item: &Item) -> bool {
        if item.score < self.min_score {
            return false;
        }
        if let Some(kind) = &self.item_kind {
            if &item.kind != kind {
                return false;
            }
        }
        if let Some(range) = &self.time_range {
            if !range.contains(item.time) {
                return false;
            }
        }
        let fields = [item.title.as_deref(), item.text.as_deref()];
        fields.iter().flatten().any(|field| {
            let folded = field.to_ascii_lowercase();
            self.terms.iter().any(|term| folded.contains(term.as_str()))
        })
    }
}
