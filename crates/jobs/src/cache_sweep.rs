use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use warden_dns_application::services::VerdictCache;

/// Periodic purge of expired memory-tier cache entries. Disk entries are
/// lazily filtered at read time, so only the memory tier needs a sweep.
pub struct CacheSweepJob {
    cache: Arc<VerdictCache>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl CacheSweepJob {
    pub fn new(cache: Arc<VerdictCache>) -> Self {
        Self {
            cache,
            interval_secs: 60,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(interval_secs = self.interval_secs, "Starting cache sweep job");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("Cache sweep job stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        let purged = self.cache.purge_expired();
                        if purged > 0 {
                            debug!(purged, "Expired cache entries swept");
                        }
                    }
                }
            }
        });
    }
}
