//! ShardAccessor: one shard, one lazily-opened read-only connection.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rusqlite::{Connection, OpenFlags};
use tempfile::TempPath;
use tracing::{debug, warn};

use hnshard_core::cancellation::{Cancellable, CancellationToken};
use hnshard_core::config::PoolConfig;
use hnshard_core::errors::ShardError;
use hnshard_core::models::{Item, ItemId, ShardDescriptor, ShardPredicate};

use crate::materialize::decompress_to_scratch;
use crate::pragmas::{apply_read_pragmas, verify_readable};
use crate::queries;

/// VM instructions between cancellation polls during a cancellable scan.
const PROGRESS_OPS: i32 = 1_000;

/// Wraps exactly one shard's storage.
///
/// The connection opens on the first query and stays open until `close`.
/// Any SQLite or I/O failure closes it again and surfaces as
/// `ShardError::Unavailable`, so the next query retries from scratch.
pub struct ShardAccessor {
    descriptor: ShardDescriptor,
    config: PoolConfig,
    scratch_dir: PathBuf,
    conn: Option<Connection>,
    /// Decompressed copy of a gzipped shard; deleted on drop.
    materialized: Option<TempPath>,
    open_gauge: Arc<AtomicUsize>,
    queries_served: u64,
}

impl ShardAccessor {
    /// Standalone accessor with its own open-connection gauge.
    pub fn new(descriptor: ShardDescriptor, config: &PoolConfig, scratch_dir: &Path) -> Self {
        Self::with_gauge(descriptor, config, scratch_dir, Arc::new(AtomicUsize::new(0)))
    }

    pub(crate) fn with_gauge(
        descriptor: ShardDescriptor,
        config: &PoolConfig,
        scratch_dir: &Path,
        open_gauge: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            descriptor,
            config: config.clone(),
            scratch_dir: scratch_dir.to_path_buf(),
            conn: None,
            materialized: None,
            open_gauge,
            queries_served: 0,
        }
    }

    pub fn descriptor(&self) -> &ShardDescriptor {
        &self.descriptor
    }

    pub fn shard_id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    pub fn queries_served(&self) -> u64 {
        self.queries_served
    }

    /// Items matching `predicate`, in ranking order, at most `predicate.limit`.
    pub fn query(&mut self, predicate: &ShardPredicate) -> Result<Vec<Item>, ShardError> {
        self.run(|conn| queries::search_items(conn, predicate))
    }

    /// Like `query`, but the scan is interrupted once `cancel` fires.
    ///
    /// `Ok(None)` means the scan was abandoned. An interrupt is not a shard
    /// failure: the connection stays open for the next query.
    pub fn query_cancellable(
        &mut self,
        predicate: &ShardPredicate,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<Item>>, ShardError> {
        let result = {
            let conn = self.connection()?;
            let token = cancel.clone();
            conn.progress_handler(PROGRESS_OPS, Some(move || token.is_cancelled()));
            let result = queries::search_items(conn, predicate);
            conn.progress_handler(0, None::<fn() -> bool>);
            result
        };
        match result {
            Err(e) if e.sqlite_error_code() == Some(rusqlite::ErrorCode::OperationInterrupted) => {
                debug!(shard_id = %self.descriptor.id, "shard scan interrupted");
                Ok(None)
            }
            other => self.settle(other).map(Some),
        }
    }

    pub fn get_item(&mut self, id: ItemId) -> Result<Option<Item>, ShardError> {
        self.run(|conn| queries::get_item(conn, id))
    }

    /// Direct children of `parent_id` as `(ord, item)`, in thread order.
    pub fn get_children(&mut self, parent_id: ItemId) -> Result<Vec<(i64, Item)>, ShardError> {
        self.run(|conn| queries::get_children(conn, parent_id))
    }

    /// Release the connection and any decompressed copy. Idempotent.
    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((_, e)) = conn.close() {
                warn!(shard_id = %self.descriptor.id, error = %e, "error closing shard connection");
            }
            self.open_gauge.fetch_sub(1, Ordering::SeqCst);
            debug!(shard_id = %self.descriptor.id, queries = self.queries_served, "closed shard");
        }
        self.materialized = None;
    }

    fn run<T>(
        &mut self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, ShardError> {
        let result = {
            let conn = self.connection()?;
            f(conn)
        };
        self.settle(result)
    }

    /// Count a success, or close the connection and report the shard.
    fn settle<T>(&mut self, result: rusqlite::Result<T>) -> Result<T, ShardError> {
        match result {
            Ok(value) => {
                self.queries_served += 1;
                Ok(value)
            }
            Err(e) => {
                let err = ShardError::unavailable(&self.descriptor.id, e);
                self.close();
                Err(err)
            }
        }
    }

    fn connection(&mut self) -> Result<&Connection, ShardError> {
        if self.conn.is_none() {
            let conn = self.open()?;
            self.open_gauge.fetch_add(1, Ordering::SeqCst);
            self.conn = Some(conn);
        }
        self.conn
            .as_ref()
            .ok_or_else(|| ShardError::unavailable(&self.descriptor.id, "connection not open"))
    }

    fn open(&mut self) -> Result<Connection, ShardError> {
        let start = Instant::now();
        let id = self.descriptor.id.clone();

        let db_path = if self.descriptor.compressed {
            let path = decompress_to_scratch(&self.descriptor.path, &self.scratch_dir)
                .map_err(|e| ShardError::unavailable(&id, format!("decompression failed: {e}")))?;
            let db_path = path.to_path_buf();
            self.materialized = Some(path);
            db_path
        } else {
            self.descriptor.path.clone()
        };

        let opened = Connection::open_with_flags(
            &db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .and_then(|conn| {
            apply_read_pragmas(&conn, &self.config)?;
            verify_readable(&conn)?;
            Ok(conn)
        });

        match opened {
            Ok(conn) => {
                debug!(
                    shard_id = %id,
                    compressed = self.descriptor.compressed,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "opened shard"
                );
                Ok(conn)
            }
            Err(e) => {
                self.materialized = None;
                Err(ShardError::unavailable(&id, e))
            }
        }
    }
}

impl Drop for ShardAccessor {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for ShardAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardAccessor")
            .field("shard_id", &self.descriptor.id)
            .field("open", &self.is_open())
            .field("queries_served", &self.queries_served)
            .finish()
    }
}
