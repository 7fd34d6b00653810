//! Background reclamation of expired entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;

use seclink_core::traits::store::ExpiringKeyValueStore;

/// Periodically purges expired entries until told to stop.
#[derive(Debug)]
pub struct Reclaimer {
    /// Store to sweep.
    store: Arc<dyn ExpiringKeyValueStore>,
    /// Delay between sweeps.
    interval: Duration,
}

impl Reclaimer {
    /// Create a reclaimer sweeping `store` every `interval`.
    pub fn new(store: Arc<dyn ExpiringKeyValueStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Run sweeps until the cancel signal flips to `true` or its sender drops.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            "Reclaimer started for '{}' store, interval={}s",
            self.store.backend_name(),
            self.interval.as_secs()
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so startup stays quiet.
        ticker.tick().await;

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!("Reclaimer received shutdown signal");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    match self.store.purge_expired().await {
                        Ok(0) => {}
                        Ok(purged) => tracing::info!(purged, "Reclaimed expired links"),
                        Err(e) => tracing::warn!(error = %e, "Failed to reclaim expired links"),
                    }
                }
            }
        }
    }

    /// Spawn [`Reclaimer::run`] onto the runtime.
    pub fn spawn(self, cancel: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel).await })
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};
    use seclink_core::traits::clock::ManualClock;

    use crate::memory::MemoryLinkStore;

    #[tokio::test(start_paused = true)]
    async fn test_sweeps_then_stops_on_signal() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = Arc::new(MemoryLinkStore::new(clock.clone()));
        store.set("gone", "a.txt", TimeDelta::seconds(1)).await.unwrap();
        store.set("kept", "b.txt", TimeDelta::hours(1)).await.unwrap();
        clock.advance(TimeDelta::seconds(2));

        let (tx, rx) = watch::channel(false);
        let handle = Reclaimer::new(store.clone(), Duration::from_secs(30)).spawn(rx);

        time::sleep(Duration::from_secs(45)).await;
        assert_eq!(store.len(), 1);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
