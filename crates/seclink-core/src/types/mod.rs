//! Shared domain types.

pub mod entry;
pub mod ttl;

pub use entry::{EntryRecord, StoredEntry};
pub use ttl::{format_ttl, parse_ttl};
