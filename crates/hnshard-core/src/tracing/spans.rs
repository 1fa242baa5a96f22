//! Span definitions per operation: search, shard query, lookup.

/// Create a search span.
#[macro_export]
macro_rules! search_span {
    ($keywords:expr, $limit:expr) => {
        tracing::info_span!("hnshard.search", keywords = ?$keywords, limit = $limit)
    };
}

/// Create a per-shard query span.
#[macro_export]
macro_rules! shard_span {
    ($shard_id:expr) => {
        tracing::debug_span!("hnshard.shard", shard_id = %$shard_id)
    };
}

/// Create an item lookup span.
#[macro_export]
macro_rules! lookup_span {
    ($item_id:expr) => {
        tracing::info_span!("hnshard.lookup", item_id = $item_id)
    };
}

