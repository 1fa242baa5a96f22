//! Error taxonomy: one enum per subsystem, unified under `HnShardError`.

pub mod catalog_error;
pub mod config_error;
pub mod error_code;
pub mod search_error;
pub mod shard_error;

pub use catalog_error::CatalogError;
pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use search_error::SearchError;
pub use shard_error::ShardError;

/// Any hnshard error.
#[derive(Debug, thiserror::Error)]
pub enum HnShardError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Shard(#[from] ShardError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ErrorCode for HnShardError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Catalog(e) => e.error_code(),
            Self::Shard(e) => e.error_code(),
            Self::Search(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}

pub type HnShardResult<T> = Result<T, HnShardError>;
