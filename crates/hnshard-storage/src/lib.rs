//! # hnshard-storage
//!
//! Physical access to the sharded archive: discovering shard files
//! ([`ShardCatalog`]), querying one shard over a lazily-opened read-only
//! SQLite connection ([`ShardAccessor`]), and bounding how many of those
//! connections exist at once ([`ShardPool`]).

pub mod accessor;
pub mod catalog;
pub mod manifest;
pub mod materialize;
pub mod pool;
pub mod pragmas;
pub mod queries;

pub use accessor::ShardAccessor;
pub use catalog::ShardCatalog;
pub use pool::{PooledAccessor, ShardPool};
