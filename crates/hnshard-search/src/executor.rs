//! Fan-out executor: runs one predicate against many shards on a bounded
//! rayon pool.
//!
//! Each shard's outcome is independent. A failing shard becomes a
//! `FailedShard` entry and never aborts its siblings. Workers block only on
//! shard I/O or on a pool checkout; cancellation is polled before every
//! shard, while waiting for a checkout, and inside a running shard scan.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use tracing::{debug, warn};

use hnshard_core::cancellation::{Cancellable, CancellationToken};
use hnshard_core::errors::ShardError;
use hnshard_core::events::{
    SearchEventHandler, ShardCompleteEvent, ShardFailedEvent, ShardSkippedEvent, SkipReason,
};
use hnshard_core::models::{FailedShard, Item, ShardDescriptor, ShardId, ShardPredicate};
use hnshard_storage::ShardPool;

/// What happened to one candidate shard.
#[derive(Debug, Clone)]
pub enum ShardOutcome {
    Completed { shard_id: ShardId, items: Vec<Item> },
    Failed(FailedShard),
    Skipped { shard_id: ShardId, reason: SkipReason },
}

impl ShardOutcome {
    pub fn shard_id(&self) -> &str {
        match self {
            Self::Completed { shard_id, .. } | Self::Skipped { shard_id, .. } => shard_id,
            Self::Failed(failed) => &failed.shard_id,
        }
    }
}

/// Outcomes in candidate order.
#[derive(Debug, Clone, Default)]
pub struct FanOut {
    pub outcomes: Vec<ShardOutcome>,
    pub early_stopped: bool,
}

impl FanOut {
    /// True if any shard was skipped because the pool shut down mid-search.
    pub fn hit_shutdown(&self) -> bool {
        self.outcomes.iter().any(|o| {
            matches!(
                o,
                ShardOutcome::Skipped {
                    reason: SkipReason::Shutdown,
                    ..
                }
            )
        })
    }
}

/// Per-call knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FanOutOptions {
    /// Skip unstarted shards once this many matches have been collected.
    pub early_stop_at: Option<usize>,
}

pub struct FanOutExecutor {
    threads: ThreadPool,
}

impl FanOutExecutor {
    /// Build a dedicated pool with `concurrency` worker threads.
    pub fn new(concurrency: usize) -> Result<Self, ThreadPoolBuildError> {
        let threads = ThreadPoolBuilder::new()
            .num_threads(concurrency.max(1))
            .thread_name(|i| format!("hnshard-fanout-{i}"))
            .build()?;
        Ok(Self { threads })
    }

    pub fn concurrency(&self) -> usize {
        self.threads.current_num_threads()
    }

    /// Apply `f` to every shard on the worker pool. Results keep shard order.
    pub fn map_shards<T, F>(&self, shards: &[ShardDescriptor], f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&ShardDescriptor) -> T + Sync + Send,
    {
        self.threads
            .install(|| shards.par_iter().with_max_len(1).map(f).collect())
    }

    /// Query every candidate with `predicate`.
    pub fn execute(
        &self,
        pool: &ShardPool,
        candidates: &[ShardDescriptor],
        predicate: &ShardPredicate,
        options: FanOutOptions,
        cancel: &CancellationToken,
        events: &dyn SearchEventHandler,
    ) -> FanOut {
        let matches = AtomicUsize::new(0);
        let stopped = AtomicBool::new(false);

        let outcomes = self.map_shards(candidates, |shard| {
            if cancel.is_cancelled() {
                return skipped(shard, SkipReason::Cancelled, events);
            }
            if let Some(threshold) = options.early_stop_at {
                if matches.load(Ordering::Acquire) >= threshold {
                    stopped.store(true, Ordering::Release);
                    return skipped(shard, SkipReason::EarlyStop, events);
                }
            }

            let outcome = query_shard(pool, shard, predicate, cancel, events);
            if let ShardOutcome::Completed { items, .. } = &outcome {
                matches.fetch_add(items.len(), Ordering::AcqRel);
            }
            outcome
        });

        FanOut {
            outcomes,
            early_stopped: stopped.load(Ordering::Acquire),
        }
    }
}

fn query_shard(
    pool: &ShardPool,
    shard: &ShardDescriptor,
    predicate: &ShardPredicate,
    cancel: &CancellationToken,
    events: &dyn SearchEventHandler,
) -> ShardOutcome {
    let _span = hnshard_core::shard_span!(shard.id).entered();
    let start = Instant::now();

    let result = match pool.checkout(shard, cancel) {
        Ok(Some(mut accessor)) => accessor.query_cancellable(predicate, cancel),
        Ok(None) => return skipped(shard, SkipReason::Cancelled, events),
        Err(ShardError::Closed) => return skipped(shard, SkipReason::Shutdown, events),
        Err(e) => Err(e),
    };

    match result {
        Ok(None) => skipped(shard, SkipReason::Cancelled, events),
        Ok(Some(items)) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            debug!(matches = items.len(), duration_ms, "shard searched");
            events.on_shard_complete(&ShardCompleteEvent {
                shard_id: shard.id.clone(),
                matches: items.len(),
                duration_ms,
            });
            ShardOutcome::Completed {
                shard_id: shard.id.clone(),
                items,
            }
        }
        Err(e) => failed(shard, &e, events),
    }
}

fn failed(
    shard: &ShardDescriptor,
    err: &ShardError,
    events: &dyn SearchEventHandler,
) -> ShardOutcome {
    warn!(shard_id = %shard.id, error = %err, "shard unavailable");
    let failed = FailedShard::from_error(shard.id.clone(), err);
    events.on_shard_failed(&ShardFailedEvent {
        shard_id: failed.shard_id.clone(),
        reason: failed.reason.clone(),
    });
    ShardOutcome::Failed(failed)
}

fn skipped(
    shard: &ShardDescriptor,
    reason: SkipReason,
    events: &dyn SearchEventHandler,
) -> ShardOutcome {
    events.on_shard_skipped(&ShardSkippedEvent {
        shard_id: shard.id.clone(),
        reason,
    });
    ShardOutcome::Skipped {
        shard_id: shard.id.clone(),
        reason,
    }
}
