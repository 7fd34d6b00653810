//! Application state shared across all handlers.

use std::sync::Arc;

use seclink_core::config::AppConfig;
use seclink_core::traits::store::ExpiringKeyValueStore;
use seclink_service::LinkService;
use seclink_storage::FileRoot;

/// Shared dependencies passed to every handler via `State<AppState>`.
///
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Link issuing and redemption.
    pub links: Arc<LinkService>,
    /// The shared files root.
    pub files: Arc<FileRoot>,
    /// The link store, for health reporting.
    pub store: Arc<dyn ExpiringKeyValueStore>,
}
