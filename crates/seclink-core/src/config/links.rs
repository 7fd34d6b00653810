//! Link issuing configuration.

use serde::{Deserialize, Serialize};

/// Settings that govern how links are minted and presented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Lifetime applied when a create request carries no TTL (e.g. `"24h"`).
    #[serde(default = "default_ttl")]
    pub default_ttl: String,
    /// Externally reachable base URL used to build full link URLs.
    #[serde(default)]
    pub external_url: Option<String>,
    /// Length of generated link identifiers in characters.
    #[serde(default = "default_id_length")]
    pub id_length: usize,
    /// How many times a colliding identifier is regenerated before giving up.
    #[serde(default = "default_max_collision_retries")]
    pub max_collision_retries: u32,
    /// Interval between background sweeps of expired entries (0 disables).
    #[serde(default = "default_reclaim_interval")]
    pub reclaim_interval_seconds: u64,
}

impl LinkConfig {
    /// Build the public URL of a link, if an external URL is configured.
    pub fn link_url(&self, id: &str) -> Option<String> {
        self.external_url
            .as_deref()
            .map(|base| format!("{}/links/{id}", base.trim_end_matches('/')))
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            default_ttl: default_ttl(),
            external_url: None,
            id_length: default_id_length(),
            max_collision_retries: default_max_collision_retries(),
            reclaim_interval_seconds: default_reclaim_interval(),
        }
    }
}

fn default_ttl() -> String {
    "24h".to_string()
}

fn default_id_length() -> usize {
    64
}

fn default_max_collision_retries() -> u32 {
    5
}

fn default_reclaim_interval() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_url_trims_trailing_slash() {
        let config = LinkConfig {
            external_url: Some("https://files.example.com/".to_string()),
            ..LinkConfig::default()
        };
        assert_eq!(
            config.link_url("abc").as_deref(),
            Some("https://files.example.com/links/abc")
        );
    }

    #[test]
    fn test_link_url_absent_without_external_url() {
        assert!(LinkConfig::default().link_url("abc").is_none());
    }
}
