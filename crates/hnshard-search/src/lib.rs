//! # hnshard-search
//!
//! The query pipeline over a sharded archive: [`validation`] rejects bad
//! input, the [`planner`] picks candidate shards, the [`executor`] fans the
//! shard predicate out on a bounded worker pool, and the [`aggregator`]
//! merges partials into one ranked [`ResultSet`](hnshard_core::ResultSet).
//! [`SearchEngine`] ties them together.

pub mod aggregator;
pub mod engine;
pub mod executor;
pub mod planner;
pub mod validation;

pub use engine::SearchEngine;
pub use executor::{FanOut, FanOutExecutor, ShardOutcome};
pub use planner::QueryPlan;
