//! `seclink links`: dump live links from the store.

use std::sync::Arc;

use seclink_core::config::AppConfig;
use seclink_core::error::AppError;
use seclink_core::traits::clock::{Clock, SystemClock};
use seclink_core::traits::store::ExpiringKeyValueStore;
use seclink_service::{LinkService, SecureIdGenerator};
use seclink_storage::FileRoot;
use seclink_store::SledLinkStore;

/// Open the store, print every live link, and close it again.
///
/// sled takes an exclusive lock, so this fails while a server is running
/// against the same data directory.
pub async fn execute(config: AppConfig) -> Result<(), AppError> {
    crate::logging::init_cli_logging();

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store: Arc<dyn ExpiringKeyValueStore> = Arc::new(SledLinkStore::open(
        config.storage.store_path(),
        Arc::clone(&clock),
    )?);
    let files = Arc::new(FileRoot::open(config.storage.files_path()).await?);

    let service = LinkService::new(
        Arc::clone(&store),
        files,
        Arc::new(SecureIdGenerator::new(config.links.id_length)),
        clock,
        config.links.clone(),
    );

    let result = service.list_links().await;
    store.close().await?;

    let json = serde_json::to_string_pretty(&result?)?;
    println!("{json}");
    Ok(())
}
