//! Persistent link store on top of sled.
//!
//! sled is an embedded log-structured tree: every `insert` and
//! `compare_and_swap` is atomic per key, reads never block on writers, and
//! iteration observes each key either before or after a concurrent write.
//! Expiry is evaluated against the injected clock on every read; expired
//! records linger on disk until [`ExpiringKeyValueStore::purge_expired`]
//! removes them.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use seclink_core::error::{AppError, ErrorKind};
use seclink_core::result::AppResult;
use seclink_core::traits::clock::Clock;
use seclink_core::traits::store::ExpiringKeyValueStore;
use seclink_core::types::{EntryRecord, StoredEntry};

use crate::codec::{decode, encode};

/// Name of the sled tree holding link entries.
const LINKS_TREE: &str = "links";

/// The open database and its links tree.
struct Handles {
    db: sled::Db,
    /// Tree of `id → EntryRecord` (JSON).
    links: sled::Tree,
}

/// sled-backed [`ExpiringKeyValueStore`].
pub struct SledLinkStore {
    /// `None` once `close` has released the database.
    handles: RwLock<Option<Handles>>,
    /// Time source for expiry decisions.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SledLinkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("SledLinkStore");
        match self.handles.try_read() {
            Ok(guard) => match guard.as_ref() {
                Some(handles) => debug.field("entries", &handles.links.len()),
                None => debug.field("closed", &true),
            },
            Err(_) => debug.field("locked", &true),
        };
        debug.finish()
    }
}

impl SledLinkStore {
    /// Open (or create) the store at `path`.
    ///
    /// Fails with `StoreFailure` if the directory cannot be opened, for
    /// example because another process holds the lock.
    pub fn open(path: impl AsRef<Path>, clock: Arc<dyn Clock>) -> AppResult<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Opening sled link store");

        let db = sled::open(path).map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreFailure,
                format!("Failed to open link store at {}", path.display()),
                e,
            )
        })?;
        let links = db.open_tree(LINKS_TREE).map_err(sled_error)?;

        info!(entries = links.len(), "Link store opened");
        Ok(Self {
            handles: RwLock::new(Some(Handles { db, links })),
            clock,
        })
    }

    /// Run `op` against the links tree, holding off `close` until it returns.
    async fn with_links<T>(&self, op: impl FnOnce(&sled::Tree) -> AppResult<T>) -> AppResult<T> {
        let guard = self.handles.read().await;
        match guard.as_ref() {
            Some(handles) => op(&handles.links),
            None => Err(AppError::store("Link store is closed")),
        }
    }
}

#[async_trait]
impl ExpiringKeyValueStore for SledLinkStore {
    fn backend_name(&self) -> &str {
        "sled"
    }

    async fn set(&self, id: &str, path: &str, ttl: TimeDelta) -> AppResult<()> {
        let record = EntryRecord::new(path, self.clock.now(), ttl);
        let encoded = encode(&record)?;
        self.with_links(|links| {
            links.insert(id.as_bytes(), encoded).map_err(sled_error)?;
            Ok(())
        })
        .await?;

        debug!(id, path, expires_at = %record.expires_at, "Stored link entry");
        Ok(())
    }

    async fn set_if_absent(&self, id: &str, path: &str, ttl: TimeDelta) -> AppResult<bool> {
        let now = self.clock.now();
        let record = EntryRecord::new(path, now, ttl);
        let encoded = encode(&record)?;

        let inserted = self
            .with_links(|links| loop {
                let current = links.get(id.as_bytes()).map_err(sled_error)?;
                if let Some(raw) = &current {
                    // An undecodable record can never be redeemed, so it may be replaced.
                    if decode(raw).is_ok_and(|existing| existing.is_live(now)) {
                        return Ok(false);
                    }
                }

                match links
                    .compare_and_swap(id.as_bytes(), current, Some(encoded.clone()))
                    .map_err(sled_error)?
                {
                    Ok(()) => return Ok(true),
                    // Lost a race with another writer; re-read and decide again.
                    Err(_) => continue,
                }
            })
            .await?;

        if inserted {
            debug!(id, path, expires_at = %record.expires_at, "Inserted link entry");
        }
        Ok(inserted)
    }

    async fn get(&self, id: &str) -> AppResult<Option<String>> {
        let Some(raw) = self
            .with_links(|links| links.get(id.as_bytes()).map_err(sled_error))
            .await?
        else {
            return Ok(None);
        };

        let record = decode(&raw)?;
        if record.is_live(self.clock.now()) {
            Ok(Some(record.path))
        } else {
            Ok(None)
        }
    }

    async fn list(&self) -> AppResult<Vec<StoredEntry>> {
        let now = self.clock.now();
        self.with_links(|links| {
            let mut entries = Vec::new();
            for item in links.iter() {
                let (key, raw) = item.map_err(sled_error)?;
                let Ok(id) = String::from_utf8(key.to_vec()) else {
                    warn!("Skipping link entry with a non UTF-8 key");
                    continue;
                };
                match decode(&raw) {
                    Ok(record) if record.is_live(now) => entries.push(record.into_stored(id)),
                    Ok(_) => {}
                    Err(e) => warn!(error = %e, "Skipping corrupt link entry"),
                }
            }
            Ok(entries)
        })
        .await
    }

    async fn purge_expired(&self) -> AppResult<u64> {
        let now = self.clock.now();
        let purged = self
            .with_links(|links| {
                let mut purged = 0u64;
                for item in links.iter() {
                    let (key, raw) = item.map_err(sled_error)?;
                    let expired = match decode(&raw) {
                        Ok(record) => !record.is_live(now),
                        Err(_) => false,
                    };
                    if !expired {
                        continue;
                    }

                    // Only remove the exact value we inspected; a concurrent `set` wins.
                    let removed = links
                        .compare_and_swap(&key, Some(&raw), None::<sled::IVec>)
                        .map_err(sled_error)?;
                    if removed.is_ok() {
                        purged += 1;
                    }
                }
                Ok(purged)
            })
            .await?;

        if purged > 0 {
            debug!(purged, "Purged expired link entries");
        }
        Ok(purged)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.handles.read().await.is_some())
    }

    async fn close(&self) -> AppResult<()> {
        let Some(handles) = self.handles.write().await.take() else {
            return Ok(());
        };
        handles.db.flush_async().await.map_err(sled_error)?;
        drop(handles);
        info!("Link store closed");
        Ok(())
    }
}

fn sled_error(err: sled::Error) -> AppError {
    AppError::with_source(
        ErrorKind::StoreFailure,
        format!("Link store error: {err}"),
        err,
    )
}
