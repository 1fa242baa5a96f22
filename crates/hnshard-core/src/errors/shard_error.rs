//! Per-shard errors. These are recovered at the fan-out boundary.

use super::error_code::{self, ErrorCode};
use crate::models::ShardId;

/// Errors raised by a single shard accessor or the shard pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShardError {
    /// The shard could not be opened or read (lock, corruption, truncation).
    #[error("shard {shard_id} unavailable: {reason}")]
    Unavailable { shard_id: ShardId, reason: String },

    /// The pool has been shut down; no more checkouts are served.
    #[error("shard pool is closed")]
    Closed,
}

impl ShardError {
    /// Build an `Unavailable` error from any displayable cause.
    pub fn unavailable(shard_id: impl Into<ShardId>, reason: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            shard_id: shard_id.into(),
            reason: reason.to_string(),
        }
    }
}

impl ErrorCode for ShardError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => error_code::SHARD_UNAVAILABLE,
            Self::Closed => error_code::POOL_CLOSED,
        }
    }
}
