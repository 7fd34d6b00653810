//! In-memory link store for tests and ephemeral deployments.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::TimeDelta;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use seclink_core::error::AppError;
use seclink_core::result::AppResult;
use seclink_core::traits::clock::Clock;
use seclink_core::traits::store::ExpiringKeyValueStore;
use seclink_core::types::{EntryRecord, StoredEntry};

/// [`ExpiringKeyValueStore`] kept in a sharded concurrent map.
///
/// Expiry follows the injected clock, so a [`ManualClock`] makes TTL
/// behaviour fully deterministic.
///
/// [`ManualClock`]: seclink_core::traits::clock::ManualClock
#[derive(Debug)]
pub struct MemoryLinkStore {
    /// `id → record`, including expired records not yet purged.
    entries: DashMap<String, EntryRecord>,
    /// Time source for expiry decisions.
    clock: Arc<dyn Clock>,
    /// Set once `close` has been called.
    closed: AtomicBool,
}

impl MemoryLinkStore {
    /// Create an empty store.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            closed: AtomicBool::new(false),
        }
    }

    /// Number of physically held records, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no records are held at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn ensure_open(&self) -> AppResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(AppError::store("Link store is closed"));
        }
        Ok(())
    }
}

#[async_trait]
impl ExpiringKeyValueStore for MemoryLinkStore {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn set(&self, id: &str, path: &str, ttl: TimeDelta) -> AppResult<()> {
        self.ensure_open()?;
        let record = EntryRecord::new(path, self.clock.now(), ttl);
        self.entries.insert(id.to_string(), record);
        Ok(())
    }

    async fn set_if_absent(&self, id: &str, path: &str, ttl: TimeDelta) -> AppResult<bool> {
        self.ensure_open()?;
        let now = self.clock.now();
        let record = EntryRecord::new(path, now, ttl);

        // The entry guard holds the shard lock, making check-and-insert atomic.
        let inserted = match self.entries.entry(id.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_live(now) {
                    false
                } else {
                    occupied.insert(record);
                    true
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(record);
                true
            }
        };

        Ok(inserted)
    }

    async fn get(&self, id: &str) -> AppResult<Option<String>> {
        self.ensure_open()?;
        let now = self.clock.now();
        Ok(self
            .entries
            .get(id)
            .filter(|record| record.is_live(now))
            .map(|record| record.path.clone()))
    }

    async fn list(&self) -> AppResult<Vec<StoredEntry>> {
        self.ensure_open()?;
        let now = self.clock.now();
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.value().is_live(now))
            .map(|entry| entry.value().clone().into_stored(entry.key().clone()))
            .collect())
    }

    async fn purge_expired(&self) -> AppResult<u64> {
        self.ensure_open()?;
        let now = self.clock.now();
        let mut purged = 0u64;
        self.entries.retain(|_, record| {
            let live = record.is_live(now);
            if !live {
                purged += 1;
            }
            live
        });

        if purged > 0 {
            debug!(purged, "Purged expired link entries");
        }
        Ok(purged)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(!self.closed.load(Ordering::SeqCst))
    }

    async fn close(&self) -> AppResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
