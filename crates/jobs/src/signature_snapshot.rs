use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use warden_dns_application::ports::SignatureSnapshotPort;
use warden_dns_application::services::SignatureStore;

/// Flushes the learned signature set to its on-disk snapshot on a timer
/// and once more at shutdown.
pub struct SignatureSnapshotJob {
    store: Arc<SignatureStore>,
    snapshot: Arc<dyn SignatureSnapshotPort>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl SignatureSnapshotJob {
    pub fn new(store: Arc<SignatureStore>, snapshot: Arc<dyn SignatureSnapshotPort>) -> Self {
        Self {
            store,
            snapshot,
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

    pub async fn flush(&self) {
        let signatures = self.store.export();
        match self.snapshot.persist(&signatures).await {
            Ok(()) => info!(signatures = signatures.len(), "Signature snapshot flushed"),
            Err(e) => error!(error = %e, "Signature snapshot flush failed"),
        }
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.interval_secs,
            "Starting signature snapshot job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        // Final flush so a clean shutdown never loses learning.
                        self.flush().await;
                        info!("Signature snapshot job stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        self.flush().await;
                    }
                }
            }
        });
    }
}
