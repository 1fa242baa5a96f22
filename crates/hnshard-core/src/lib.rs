//! # hnshard-core
//!
//! Foundation crate for the hnshard archive search engine.
//! Defines the data model, errors, config, cancellation, events, and tracing.
//! Every other crate in the workspace depends on this.

pub mod cancellation;
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod models;
pub mod tracing;

// Re-export the most commonly used types at the crate root.
pub use cancellation::{Cancellable, CancellationToken};
pub use config::HnShardConfig;
pub use errors::{HnShardError, HnShardResult};
pub use models::{
    FailedShard, IdRange, Item, ItemId, ItemKind, Query, ResultSet, ShardDescriptor, ShardId,
    ShardPredicate, TimeRange,
};
