//! PRAGMA configuration applied to every shard connection.
//!
//! Shards are read-only: query_only ON, configurable page cache and mmap,
//! busy_timeout for files locked by an external extractor, temp_store MEMORY.

use rusqlite::Connection;

use hnshard_core::config::PoolConfig;

/// Apply read-only pragmas to a freshly opened shard connection.
pub fn apply_read_pragmas(conn: &Connection, config: &PoolConfig) -> rusqlite::Result<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA query_only = ON;
        PRAGMA cache_size = {};
        PRAGMA mmap_size = {};
        PRAGMA busy_timeout = {};
        PRAGMA temp_store = MEMORY;
        ",
        config.cache_size, config.mmap_size, config.busy_timeout_ms
    ))
}

/// Cheap header check: fails fast on files that are not SQLite databases.
pub fn verify_readable(conn: &Connection) -> rusqlite::Result<()> {
    conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|_| ())
}
