//! ShardPool: bounded, process-wide cache of shard accessors with LRU eviction.
//!
//! Invariants:
//! - at most `capacity` accessors exist at once (idle + checked out), so at
//!   most `capacity` shard connections are open;
//! - each shard has at most one accessor, and it is checked out to at most
//!   one worker at a time;
//! - eviction only ever closes idle (checked-in) accessors.

use std::collections::HashSet;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Duration;

use lru::LruCache;
use tempfile::TempDir;
use tracing::{debug, info};

use hnshard_core::cancellation::Cancellable;
use hnshard_core::config::PoolConfig;
use hnshard_core::errors::ShardError;
use hnshard_core::models::{PoolStats, ShardDescriptor, ShardId};

use crate::accessor::ShardAccessor;

/// How often a blocked checkout re-polls its cancellation token.
const CHECKOUT_POLL: Duration = Duration::from_millis(25);

struct PoolState {
    idle: LruCache<ShardId, ShardAccessor>,
    checked_out: HashSet<ShardId>,
    closed: bool,
}

impl PoolState {
    fn live(&self) -> usize {
        self.idle.len() + self.checked_out.len()
    }
}

/// Where decompressed shard copies go.
enum Scratch {
    Owned(TempDir),
    Shared(PathBuf),
}

impl Scratch {
    fn path(&self) -> &Path {
        match self {
            Self::Owned(dir) => dir.path(),
            Self::Shared(path) => path,
        }
    }
}

pub struct ShardPool {
    config: PoolConfig,
    scratch: Scratch,
    state: Mutex<PoolState>,
    returned: Condvar,
    open_gauge: Arc<AtomicUsize>,
    evictions: AtomicU64,
}

impl ShardPool {
    /// Create a pool. With no `scratch_dir`, a private temp directory is
    /// created and removed when the pool drops.
    pub fn new(config: &PoolConfig, scratch_dir: Option<&Path>) -> std::io::Result<Self> {
        let scratch = match scratch_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                Scratch::Shared(dir.to_path_buf())
            }
            None => Scratch::Owned(
                tempfile::Builder::new()
                    .prefix("hnshard-scratch-")
                    .tempdir()?,
            ),
        };
        Ok(Self {
            config: PoolConfig {
                capacity: config.capacity.max(1),
                ..config.clone()
            },
            scratch,
            state: Mutex::new(PoolState {
                idle: LruCache::unbounded(),
                checked_out: HashSet::new(),
                closed: false,
            }),
            returned: Condvar::new(),
            open_gauge: Arc::new(AtomicUsize::new(0)),
            evictions: AtomicU64::new(0),
        })
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Number of shard connections currently open.
    pub fn open_connections(&self) -> usize {
        self.open_gauge.load(Ordering::SeqCst)
    }

    pub fn checked_out(&self) -> usize {
        self.lock().checked_out.len()
    }

    pub fn stats(&self) -> PoolStats {
        let state = self.lock();
        PoolStats {
            capacity: self.config.capacity,
            open_connections: self.open_connections(),
            idle: state.idle.len(),
            checked_out: state.checked_out.len(),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Check out the accessor for `shard`, blocking while the pool is full
    /// of checked-out accessors or while another worker holds this shard.
    ///
    /// Returns `Ok(None)` if `cancel` fires while waiting.
    pub fn checkout(
        &self,
        shard: &ShardDescriptor,
        cancel: &dyn Cancellable,
    ) -> Result<Option<PooledAccessor<'_>>, ShardError> {
        let mut evicted = Vec::new();
        let outcome = {
            let mut state = self.lock();
            loop {
                if state.closed {
                    break Err(ShardError::Closed);
                }
                if cancel.is_cancelled() {
                    break Ok(None);
                }
                if !state.checked_out.contains(&shard.id) {
                    if let Some(accessor) = state.idle.pop(&shard.id) {
                        state.checked_out.insert(shard.id.clone());
                        break Ok(Some(accessor));
                    }
                    if state.live() < self.config.capacity {
                        state.checked_out.insert(shard.id.clone());
                        break Ok(Some(ShardAccessor::with_gauge(
                            shard.clone(),
                            &self.config,
                            self.scratch.path(),
                            Arc::clone(&self.open_gauge),
                        )));
                    }
                    if let Some((victim_id, victim)) = state.idle.pop_lru() {
                        debug!(shard_id = %victim_id, "evicting least-recently-used shard");
                        self.evictions.fetch_add(1, Ordering::Relaxed);
                        evicted.push(victim);
                        continue;
                    }
                }
                state = match self.returned.wait_timeout(state, CHECKOUT_POLL) {
                    Ok((guard, _)) => guard,
                    Err(poisoned) => poisoned.into_inner().0,
                };
            }
        };

        // Close evicted accessors outside the lock.
        for mut victim in evicted {
            victim.close();
        }

        outcome.map(|accessor| {
            accessor.map(|accessor| PooledAccessor {
                pool: self,
                accessor: Some(accessor),
            })
        })
    }

    fn check_in(&self, accessor: ShardAccessor) {
        let id = accessor.shard_id().to_string();
        let reject = {
            let mut state = self.lock();
            state.checked_out.remove(&id);
            if state.closed {
                Some(accessor)
            } else {
                state.idle.put(id, accessor);
                None
            }
        };
        if let Some(mut rejected) = reject {
            rejected.close();
        }
        self.returned.notify_all();
    }

    /// Close every idle accessor and refuse further checkouts. Checked-out
    /// accessors are closed as they come back. Idempotent.
    pub fn close_all(&self) {
        let drained: Vec<ShardAccessor> = {
            let mut state = self.lock();
            if state.closed && state.idle.is_empty() {
                return;
            }
            state.closed = true;
            let mut drained = Vec::with_capacity(state.idle.len());
            while let Some((_, accessor)) = state.idle.pop_lru() {
                drained.push(accessor);
            }
            drained
        };
        let count = drained.len();
        for mut accessor in drained {
            accessor.close();
        }
        self.returned.notify_all();
        info!(closed = count, "shard pool closed");
    }

    fn lock(&self) -> MutexGuard<'_, PoolState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Drop for ShardPool {
    fn drop(&mut self) {
        self.close_all();
    }
}

/// A checked-out accessor. Returns itself to the pool on drop, including
/// when a worker unwinds or is abandoned by a cancelled search.
pub struct PooledAccessor<'a> {
    pool: &'a ShardPool,
    accessor: Option<ShardAccessor>,
}

impl Deref for PooledAccessor<'_> {
    type Target = ShardAccessor;

    fn deref(&self) -> &ShardAccessor {
        self.accessor
            .as_ref()
            .unwrap_or_else(|| unreachable!("accessor is present until drop"))
    }
}

impl DerefMut for PooledAccessor<'_> {
    fn deref_mut(&mut self) -> &mut ShardAccessor {
        self.accessor
            .as_mut()
            .unwrap_or_else(|| unreachable!("accessor is present until drop"))
    }
}

impl Drop for PooledAccessor<'_> {
    fn drop(&mut self) {
        if let Some(accessor) = self.accessor.take() {
            self.pool.check_in(accessor);
        }
    }
}
