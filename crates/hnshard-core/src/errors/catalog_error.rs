//! Shard catalog errors. All of them are fatal for any query.

use std::path::PathBuf;

use super::error_code::{self, ErrorCode};

/// Errors raised while discovering shard files.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("archive root does not exist: {}", path.display())]
    RootMissing { path: PathBuf },

    #[error("archive root is not a directory: {}", path.display())]
    RootNotDirectory { path: PathBuf },

    #[error("no shard files found under {}", path.display())]
    NoShards { path: PathBuf },

    #[error("IO error scanning {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ErrorCode for CatalogError {
    fn error_code(&self) -> &'static str {
        error_code::CATALOG_ERROR
    }
}
