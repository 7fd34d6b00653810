//! Link store entries.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// The value half of a stored link, as persisted by a store backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    /// File path relative to the shared files root.
    pub path: String,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
    /// Absolute expiry; the entry is logically absent from this instant on.
    pub expires_at: DateTime<Utc>,
}

impl EntryRecord {
    /// Build a record that expires `ttl` after `now`.
    ///
    /// A zero or negative `ttl` yields an entry that is already expired.
    pub fn new(path: impl Into<String>, now: DateTime<Utc>, ttl: TimeDelta) -> Self {
        let expires_at = now.checked_add_signed(ttl).unwrap_or(if ttl > TimeDelta::zero() {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        });
        Self {
            path: path.into(),
            created_at: now,
            expires_at,
        }
    }

    /// Whether the entry is still live at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Attach the key to produce a listing entry.
    pub fn into_stored(self, id: impl Into<String>) -> StoredEntry {
        StoredEntry {
            id: id.into(),
            path: self.path,
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}

/// A live entry returned by a store scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    /// Link identifier.
    pub id: String,
    /// File path relative to the shared files root.
    pub path: String,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let now = Utc::now();
        let record = EntryRecord::new("a.txt", now, TimeDelta::seconds(10));
        assert!(record.is_live(now + TimeDelta::seconds(9)));
        assert!(!record.is_live(now + TimeDelta::seconds(10)));
    }

    #[test]
    fn test_non_positive_ttl_is_already_expired() {
        let now = Utc::now();
        assert!(!EntryRecord::new("a.txt", now, TimeDelta::zero()).is_live(now));
        assert!(!EntryRecord::new("a.txt", now, TimeDelta::seconds(-5)).is_live(now));
    }
}
