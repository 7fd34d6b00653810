//! The expiring key/value capability behind the link service.

use async_trait::async_trait;
use chrono::TimeDelta;

use crate::result::AppResult;
use crate::types::entry::StoredEntry;

/// A persistent map from link id to file path where every entry expires.
///
/// Reads of an expired entry behave exactly like reads of a key that never
/// existed. Implementations serialize writes per instance, allow reads to
/// run alongside writes, and never expose a partially written entry.
///
/// There is no delete: links end by expiring. Revocation would add a
/// method here and a matching service call.
#[async_trait]
pub trait ExpiringKeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend name (e.g., "sled", "memory").
    fn backend_name(&self) -> &str;

    /// Upsert `id → path`, expiring `ttl` from now.
    ///
    /// Overwrites any previous value and expiry. A non-positive `ttl` is
    /// stored as-is and produces an entry that is already expired.
    async fn set(&self, id: &str, path: &str, ttl: TimeDelta) -> AppResult<()>;

    /// Write `id → path` only if `id` is absent or expired.
    ///
    /// Returns `true` if the value was written, `false` if a live entry
    /// already holds the key.
    async fn set_if_absent(&self, id: &str, path: &str, ttl: TimeDelta) -> AppResult<bool>;

    /// Return the path stored under `id` if the entry is still live.
    async fn get(&self, id: &str) -> AppResult<Option<String>>;

    /// Enumerate every live entry. Order is unspecified.
    async fn list(&self) -> AppResult<Vec<StoredEntry>>;

    /// Physically remove expired entries and return how many were dropped.
    ///
    /// Never affects the logical result of `get` or `list`.
    async fn purge_expired(&self) -> AppResult<u64>;

    /// Check that the backend is open and usable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Release resources. Every later call fails with `StoreFailure`.
    async fn close(&self) -> AppResult<()>;
}
