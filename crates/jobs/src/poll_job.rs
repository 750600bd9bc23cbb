use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use warden_dns_application::use_cases::PollUpstreamUseCase;

/// Drives the upstream poll tick on a fixed interval. A tick that runs
/// long makes the next one a no-op inside the use case (skip, never
/// stack); a failed tick is logged and the loop continues.
pub struct PollJob {
    poll: Arc<PollUpstreamUseCase>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl PollJob {
    pub fn new(poll: Arc<PollUpstreamUseCase>, interval_secs: u64) -> Self {
        Self {
            poll,
            interval_secs,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(interval_secs = self.interval_secs, "Starting upstream poll job");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("Poll job stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        if let Err(e) = self.poll.execute().await {
                            error!(error = %e, "Poll tick failed");
                        }
                    }
                }
            }
        });
    }
}
