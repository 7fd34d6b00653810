//! # seclink-store
//!
//! Implementations of [`ExpiringKeyValueStore`]: a sled-backed store for
//! production and an in-memory store driven by an injectable clock for
//! tests. Also provides the background task that reclaims space held by
//! expired entries.
//!
//! [`ExpiringKeyValueStore`]: seclink_core::traits::ExpiringKeyValueStore

mod codec;
#[cfg(feature = "memory")]
pub mod memory;
pub mod reclaim;
#[cfg(feature = "sled-backend")]
pub mod sled_store;

#[cfg(feature = "memory")]
pub use memory::MemoryLinkStore;
pub use reclaim::Reclaimer;
#[cfg(feature = "sled-backend")]
pub use sled_store::SledLinkStore;
