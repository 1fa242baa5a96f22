//! Errors surfaced by the query facade.

use super::catalog_error::CatalogError;
use super::error_code::{self, ErrorCode};
use crate::models::{FailedShard, ResultSet};

/// Everything `SearchEngine::search` can fail with.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("query has no keywords")]
    EmptyKeywords,

    #[error("keyword {index} is blank")]
    BlankKeyword { index: usize },

    #[error("too many keywords: {count} (max {max})")]
    TooManyKeywords { count: usize, max: usize },

    #[error("limit must be a positive integer, got {limit}")]
    InvalidLimit { limit: i64 },

    #[error("limit {limit} exceeds the maximum of {max}")]
    LimitTooLarge { limit: i64, max: usize },

    #[error("minimum score must be non-negative, got {min_score}")]
    NegativeMinScore { min_score: i64 },

    #[error("time range start {start} is after end {end}")]
    InvalidTimeRange { start: i64, end: i64 },

    #[error("max_shards must be at least 1")]
    InvalidMaxShards,

    /// Caller-initiated. `partial` is populated only when the query asked
    /// for partial results on cancel.
    #[error("search cancelled")]
    Cancelled { partial: Option<Box<ResultSet>> },

    #[error("all {} candidate shards are unavailable", failed.len())]
    AllShardsUnavailable { failed: Vec<FailedShard> },

    #[error("search engine has been shut down")]
    Shutdown,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl SearchError {
    /// True for errors caused by bad caller input (no shard I/O was attempted).
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::EmptyKeywords
                | Self::BlankKeyword { .. }
                | Self::TooManyKeywords { .. }
                | Self::InvalidLimit { .. }
                | Self::LimitTooLarge { .. }
                | Self::NegativeMinScore { .. }
                | Self::InvalidTimeRange { .. }
                | Self::InvalidMaxShards
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

impl ErrorCode for SearchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Cancelled { .. } => error_code::CANCELLED,
            Self::AllShardsUnavailable { .. } => error_code::ALL_SHARDS_UNAVAILABLE,
            Self::Shutdown => error_code::POOL_CLOSED,
            Self::Catalog(e) => e.error_code(),
            _ => error_code::INVALID_QUERY,
        }
    }
}
