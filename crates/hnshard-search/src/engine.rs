//! SearchEngine: the query facade.
//!
//! validate → plan → fan out → aggregate. Stateless per call apart from the
//! shared shard pool and the catalog cache, both owned here and torn down by
//! `shutdown` or on drop.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use hnshard_core::cancellation::{Cancellable, CancellationToken};
use hnshard_core::config::HnShardConfig;
use hnshard_core::constants::VERSION;
use hnshard_core::errors::{CatalogError, ConfigError, HnShardResult, SearchError, ShardError};
use hnshard_core::events::{
    NoOpEventHandler, SearchCompleteEvent, SearchEventHandler, SearchStartedEvent,
};
use hnshard_core::models::{
    ArchiveStats, IdRange, Item, ItemId, PoolStats, Query, ResultSet, ShardDescriptor, TimeRange,
};
use hnshard_storage::{ShardCatalog, ShardPool};

use crate::aggregator;
use crate::executor::{FanOutExecutor, FanOutOptions};
use crate::planner;
use crate::validation::validate_query;

pub struct SearchEngine {
    config: HnShardConfig,
    catalog: ShardCatalog,
    pool: ShardPool,
    executor: FanOutExecutor,
    events: Arc<dyn SearchEventHandler>,
}

impl SearchEngine {
    /// Build an engine. Neither the catalog scan nor any shard open happens
    /// here; both are deferred to the first call that needs them.
    pub fn open(config: HnShardConfig) -> HnShardResult<Self> {
        config.validate()?;

        let catalog = ShardCatalog::new(&config.archive);
        let scratch = config.archive.scratch_dir.as_deref();
        let pool = ShardPool::new(&config.pool, scratch).map_err(|e| CatalogError::Io {
            path: scratch.map_or_else(std::env::temp_dir, |p| p.to_path_buf()),
            source: e,
        })?;
        let executor = FanOutExecutor::new(config.search.concurrency).map_err(|e| {
            ConfigError::InvalidValue {
                field: "search.concurrency".to_string(),
                message: e.to_string(),
            }
        })?;

        info!(
            version = VERSION,
            root = %config.archive.root.display(),
            pool_capacity = config.pool.capacity,
            concurrency = executor.concurrency(),
            "search engine ready"
        );

        Ok(Self {
            config,
            catalog,
            pool,
            executor,
            events: Arc::new(NoOpEventHandler),
        })
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn SearchEventHandler>) -> Self {
        self.events = handler;
        self
    }

    pub fn config(&self) -> &HnShardConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ShardCatalog {
        &self.catalog
    }

    /// A query over `keywords` with the configured default limit.
    pub fn query_for<I, S>(&self, keywords: I) -> Query
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Query::new(keywords, self.config.search.default_limit as i64)
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Keyword search across the archive.
    ///
    /// Returns a possibly partial result whose flags say so, or an error.
    /// Invalid input fails before the catalog or any shard is touched.
    pub fn search(
        &self,
        query: &Query,
        cancel: &CancellationToken,
    ) -> Result<ResultSet, SearchError> {
        let _span = hnshard_core::search_span!(query.keywords, query.limit).entered();
        let start = Instant::now();

        validate_query(query, self.config.search.max_limit)?;
        if self.pool.is_closed() {
            return Err(SearchError::Shutdown);
        }

        let shards = self.catalog.list_shards()?;
        let plan = planner::plan(&shards, query);
        let limit = plan.predicate.limit;

        self.events.on_search_started(&SearchStartedEvent {
            keywords: plan.predicate.terms.clone(),
            candidate_shards: plan.candidates.len(),
        });

        let options = FanOutOptions {
            early_stop_at: query.allow_early_stop.then_some(limit),
        };
        let fan_out = self.executor.execute(
            &self.pool,
            &plan.candidates,
            &plan.predicate,
            options,
            cancel,
            self.events.as_ref(),
        );

        if fan_out.hit_shutdown() {
            return Err(SearchError::Shutdown);
        }

        let mut result = aggregator::aggregate(fan_out, plan.excluded, limit);
        result.elapsed_ms = start.elapsed().as_millis() as u64;

        if cancel.is_cancelled() {
            info!(
                deadline_exceeded = cancel.deadline_exceeded(),
                shards_attempted = result.shards_attempted,
                skipped = result.skipped_shards.len(),
                "search cancelled"
            );
            return Err(SearchError::Cancelled {
                partial: query.partial_on_cancel.then(|| Box::new(result)),
            });
        }

        if !plan.candidates.is_empty() && result.failed_shards.len() == plan.candidates.len() {
            return Err(SearchError::AllShardsUnavailable {
                failed: result.failed_shards,
            });
        }

        self.events.on_search_complete(&SearchCompleteEvent {
            returned: result.items.len(),
            total_candidates: result.total_candidates,
            failed_shards: result.failed_shards.len(),
            skipped_shards: result.skipped_shards.len(),
            duration_ms: result.elapsed_ms,
        });
        info!(
            returned = result.items.len(),
            total_candidates = result.total_candidates,
            shards_attempted = result.shards_attempted,
            failed = result.failed_shards.len(),
            skipped = result.skipped_shards.len(),
            pruned = plan.pruned,
            partial = result.partial,
            elapsed_ms = result.elapsed_ms,
            "search complete"
        );
        Ok(result)
    }

    /// Point lookup. Shards are probed newest first; shards whose known id
    /// range excludes `id` are not opened. Unavailable shards are skipped.
    pub fn get_item(&self, id: ItemId) -> Result<Option<Item>, SearchError> {
        let _span = hnshard_core::lookup_span!(id).entered();
        if self.pool.is_closed() {
            return Err(SearchError::Shutdown);
        }
        let shards = self.catalog.list_shards()?;
        let never = CancellationToken::new();

        for shard in shards.iter().rev().filter(|s| s.may_contain_id(id)) {
            let found = match self.pool.checkout(shard, &never) {
                Ok(Some(mut accessor)) => accessor.get_item(id),
                Ok(None) => continue,
                Err(ShardError::Closed) => return Err(SearchError::Shutdown),
                Err(e) => Err(e),
            };
            match found {
                Ok(Some(item)) => {
                    debug!(shard_id = %shard.id, "item found");
                    return Ok(Some(item));
                }
                Ok(None) => {}
                Err(e) => warn!(shard_id = %shard.id, error = %e, "skipping unavailable shard"),
            }
        }
        Ok(None)
    }

    /// Direct children of `id`, ordered by shard (oldest first) then by
    /// sibling order. Shards without thread data contribute nothing.
    pub fn get_thread(&self, id: ItemId) -> Result<Vec<Item>, SearchError> {
        let _span = hnshard_core::lookup_span!(id).entered();
        if self.pool.is_closed() {
            return Err(SearchError::Shutdown);
        }
        let shards = self.catalog.list_shards()?;
        let never = CancellationToken::new();

        let per_shard = self.executor.map_shards(&shards, |shard| {
            let children = match self.pool.checkout(shard, &never) {
                Ok(Some(mut accessor)) => accessor.get_children(id),
                Ok(None) => Ok(Vec::new()),
                Err(e) => Err(e),
            };
            children.unwrap_or_else(|e| {
                warn!(shard_id = %shard.id, error = %e, "skipping unavailable shard");
                Vec::new()
            })
        });

        let mut seen = HashSet::new();
        Ok(per_shard
            .into_iter()
            .flatten()
            .map(|(_, item)| item)
            .filter(|item| seen.insert(item.id))
            .collect())
    }

    /// Archive-wide metadata. Opens no shard.
    pub fn stats(&self) -> Result<ArchiveStats, SearchError> {
        let shards = self.catalog.list_shards()?;
        Ok(archive_stats(&shards, self.pool.stats()))
    }

    /// Close every pooled accessor. Later calls fail with `Shutdown`.
    /// Idempotent; also runs on drop.
    pub fn shutdown(&self) {
        self.pool.close_all();
    }

    pub fn is_shut_down(&self) -> bool {
        self.pool.is_closed()
    }
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("root", &self.config.archive.root)
            .field("pool", &self.pool.stats())
            .field("concurrency", &self.executor.concurrency())
            .finish()
    }
}

fn archive_stats(shards: &[ShardDescriptor], pool: PoolStats) -> ArchiveStats {
    let id_bounds = shards
        .iter()
        .filter_map(|s| s.id_range)
        .reduce(|a, b| IdRange::new(a.lo.min(b.lo), a.hi.max(b.hi)));
    let time_bounds = shards
        .iter()
        .filter_map(|s| s.time_range)
        .reduce(|a, b| TimeRange::new(a.start.min(b.start), a.end.max(b.end)));
    let counts: Vec<u64> = shards.iter().filter_map(|s| s.item_count).collect();

    ArchiveStats {
        total_shards: shards.len(),
        compressed_shards: shards.iter().filter(|s| s.compressed).count(),
        total_bytes: shards.iter().map(|s| s.size_bytes).sum(),
        id_bounds,
        time_bounds,
        estimated_items: (!counts.is_empty()).then(|| counts.iter().sum()),
        pool,
    }
}
