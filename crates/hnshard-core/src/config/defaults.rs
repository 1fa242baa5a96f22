// Single source of truth for all default values.

// --- Archive ---
pub const DEFAULT_ARCHIVE_ROOT: &str = "downloaded-site/static-shards";
pub const DEFAULT_MANIFEST_FILE: &str = "manifest.json";

// --- Pool ---
pub const DEFAULT_POOL_CAPACITY: usize = 64;
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_CACHE_SIZE: i64 = -16_000; // 16 MB (negative = KB)
pub const DEFAULT_MMAP_SIZE: u64 = 0;

// --- Search ---
pub const DEFAULT_LIMIT: usize = 20;
pub const DEFAULT_MAX_LIMIT: usize = 1_000;
pub const MIN_CONCURRENCY: usize = 4;
pub const MAX_CONCURRENCY: usize = 32;

/// Worker count sized to the host's parallelism, clamped to a sane I/O band.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(MIN_CONCURRENCY)
        .clamp(MIN_CONCURRENCY, MAX_CONCURRENCY)
}
