/// hnshard version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name prefix every shard file carries.
pub const SHARD_FILE_PREFIX: &str = "shard_";

/// Extension of a plain SQLite shard.
pub const SHARD_EXT_PLAIN: &str = ".sqlite";

/// Extension of a gzip-compressed SQLite shard.
pub const SHARD_EXT_GZIP: &str = ".sqlite.gz";

/// Maximum characters kept by `Item::text_preview` in result summaries.
pub const TEXT_PREVIEW_CHARS: usize = 500;

/// Upper bound on keyword terms in a single query.
pub const MAX_KEYWORDS: usize = 64;

/// Escape character used when translating keyword terms into `LIKE` patterns.
pub const LIKE_ESCAPE: char = '\\';
