pub mod item;
pub mod predicate;
pub mod query;
pub mod result_set;
pub mod shard;
pub mod stats;

pub use item::{decode_entities, Item, ItemId, ItemKind};
pub use predicate::ShardPredicate;
pub use query::Query;
pub use result_set::{FailedShard, ResultSet};
pub use shard::{IdRange, ShardDescriptor, ShardId, TimeRange};
pub use stats::{ArchiveStats, PoolStats};
