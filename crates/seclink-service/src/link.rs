//! Link issuing, redemption, and listing.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use seclink_core::config::links::LinkConfig;
use seclink_core::error::{AppError, ErrorKind};
use seclink_core::result::AppResult;
use seclink_core::traits::clock::Clock;
use seclink_core::traits::store::ExpiringKeyValueStore;
use seclink_core::types::{format_ttl, parse_ttl};
use seclink_storage::{FileRoot, SharedFile};

use crate::id::IdGenerator;

/// Result of a successful [`LinkService::create_link`].
#[derive(Debug, Clone, Serialize)]
pub struct CreatedLink {
    /// The new link identifier.
    pub id: String,
    /// Shared path, relative to the files root.
    pub path: String,
    /// Full public URL, when an external URL is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// When the link stops granting access.
    pub expires_at: DateTime<Utc>,
}

/// A live link as shown to administrators.
#[derive(Debug, Clone, Serialize)]
pub struct LinkSummary {
    /// Link identifier.
    pub id: String,
    /// Shared path, relative to the files root.
    pub path: String,
    /// Full public URL, when an external URL is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// When the link stops granting access.
    pub expires_at: DateTime<Utc>,
    /// Whole seconds until expiry, never negative.
    pub remaining_ttl_seconds: i64,
    /// Remaining lifetime formatted like `5h2m10s`.
    pub remaining_ttl: String,
}

/// Issues and redeems expiring links.
///
/// The service owns no state of its own; everything lives in the store, so
/// one instance is shared by every request handler.
#[derive(Debug, Clone)]
pub struct LinkService {
    /// Where `id → path` mappings live.
    store: Arc<dyn ExpiringKeyValueStore>,
    /// The only directory links may point into.
    files: Arc<FileRoot>,
    /// Identifier source.
    ids: Arc<dyn IdGenerator>,
    /// Time source shared with the store.
    clock: Arc<dyn Clock>,
    /// Link settings.
    config: LinkConfig,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(
        store: Arc<dyn ExpiringKeyValueStore>,
        files: Arc<FileRoot>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        config: LinkConfig,
    ) -> Self {
        Self {
            store,
            files,
            ids,
            clock,
            config,
        }
    }

    /// The link settings in effect.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// The configured lifetime for requests that do not name one.
    pub fn default_ttl(&self) -> AppResult<TimeDelta> {
        parse_ttl(&self.config.default_ttl)
    }

    /// Turn an optional TTL string from a request into a lifetime.
    pub fn request_ttl(&self, ttl: Option<&str>) -> AppResult<TimeDelta> {
        match ttl.map(str::trim).filter(|t| !t.is_empty()) {
            Some(ttl) => parse_ttl(ttl),
            None => self.default_ttl(),
        }
    }

    /// Share `path` for `ttl`.
    ///
    /// The path is validated before anything is written. The id is inserted
    /// with a conditional write, so a generated id that is already live is
    /// discarded and regenerated instead of replacing someone else's link.
    pub async fn create_link(&self, path: &str, ttl: TimeDelta) -> AppResult<CreatedLink> {
        if ttl <= TimeDelta::zero() {
            return Err(AppError::invalid_input(format!(
                "TTL must be positive, got {}s",
                ttl.num_seconds()
            )));
        }

        self.files.resolve(path).await?;

        let attempts = self.config.max_collision_retries.saturating_add(1);
        for attempt in 1..=attempts {
            let id = self.ids.generate()?;
            let expires_at = self
                .clock
                .now()
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC);

            if self.store.set_if_absent(&id, path, ttl).await? {
                info!(path, ttl = %format_ttl(ttl), "Link created");
                debug!(id = %id, path, %expires_at, "Link id issued");
                return Ok(CreatedLink {
                    url: self.config.link_url(&id),
                    id,
                    path: path.to_string(),
                    expires_at,
                });
            }

            warn!(attempt, "Generated link id collided with a live link, retrying");
        }

        Err(AppError::store(format!(
            "Could not allocate a unique link id after {attempts} attempts"
        )))
    }

    /// Open the file behind a link.
    ///
    /// Unknown, expired, and dangling links, as well as store failures, all
    /// come back as the same `NotFound` error.
    pub async fn redeem_link(&self, id: &str) -> AppResult<SharedFile> {
        if id.is_empty() {
            return Err(not_found());
        }

        let path = match self.store.get(id).await {
            Ok(Some(path)) => path,
            Ok(None) => {
                debug!(id, "Link missing or expired");
                return Err(not_found());
            }
            Err(e) => {
                warn!(error = %e, "Link lookup failed");
                return Err(not_found());
            }
        };

        match self.files.open_file(&path).await {
            Ok(file) => {
                info!(path = %path, size = file.size, "Link redeemed");
                Ok(file)
            }
            Err(e) => {
                if e.is(ErrorKind::Unsafe) {
                    warn!(path = %path, "Linked path now resolves outside the files root");
                } else {
                    debug!(path = %path, error = %e, "Linked file unavailable");
                }
                Err(not_found())
            }
        }
    }

    /// All live links, soonest expiry first.
    pub async fn list_links(&self) -> AppResult<Vec<LinkSummary>> {
        let now = self.clock.now();
        let mut links: Vec<LinkSummary> = self
            .store
            .list()
            .await?
            .into_iter()
            .filter_map(|entry| {
                let remaining = entry.expires_at - now;
                if remaining <= TimeDelta::zero() {
                    return None;
                }
                Some(LinkSummary {
                    url: self.config.link_url(&entry.id),
                    remaining_ttl_seconds: remaining.num_seconds(),
                    remaining_ttl: format_ttl(remaining),
                    id: entry.id,
                    path: entry.path,
                    expires_at: entry.expires_at,
                })
            })
            .collect();

        links.sort_by(|a, b| a.expires_at.cmp(&b.expires_at).then_with(|| a.id.cmp(&b.id)));
        Ok(links)
    }
}

fn not_found() -> AppError {
    AppError::not_found("Link not found")
}
