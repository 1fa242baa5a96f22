//! Search lifecycle events.
//! Trait with no-op defaults, synchronous dispatch from worker threads.

use crate::models::ShardId;

#[derive(Debug, Clone)]
pub struct SearchStartedEvent {
    pub keywords: Vec<String>,
    pub candidate_shards: usize,
}

#[derive(Debug, Clone)]
pub struct ShardCompleteEvent {
    pub shard_id: ShardId,
    pub matches: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone)]
pub struct ShardFailedEvent {
    pub shard_id: ShardId,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Cancelled,
    EarlyStop,
    /// The pool was shut down while the search was running.
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct ShardSkippedEvent {
    pub shard_id: ShardId,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct SearchCompleteEvent {
    pub returned: usize,
    pub total_candidates: usize,
    pub failed_shards: usize,
    pub skipped_shards: usize,
    pub duration_ms: u64,
}

/// Observer for search progress.
///
/// All methods have no-op default implementations, so handlers only need
/// to override the events they care about. Shard events arrive from fan-out
/// worker threads in completion order.
pub trait SearchEventHandler: Send + Sync {
    fn on_search_started(&self, _event: &SearchStartedEvent) {}
    fn on_shard_complete(&self, _event: &ShardCompleteEvent) {}
    fn on_shard_failed(&self, _event: &ShardFailedEvent) {}
    fn on_shard_skipped(&self, _event: &ShardSkippedEvent) {}
    fn on_search_complete(&self, _event: &SearchCompleteEvent) {}
}

/// Handler that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpEventHandler;

impl SearchEventHandler for NoOpEventHandler {}
