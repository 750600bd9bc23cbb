use crate::{CacheSweepJob, PollJob, SignatureSnapshotJob};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Builder that owns the background jobs and starts them together with a
/// shared cancellation token.
pub struct JobRunner {
    poll: Option<PollJob>,
    cache_sweep: Option<CacheSweepJob>,
    signature_snapshot: Option<SignatureSnapshotJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            poll: None,
            cache_sweep: None,
            signature_snapshot: None,
            shutdown: None,
        }
    }

    pub fn with_poll(mut self, job: PollJob) -> Self {
        self.poll = Some(job);
        self
    }

    pub fn with_cache_sweep(mut self, job: CacheSweepJob) -> Self {
        self.cache_sweep = Some(job);
        self
    }

    pub fn with_signature_snapshot(mut self, job: SignatureSnapshotJob) -> Self {
        self.signature_snapshot = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub async fn start(self) {
        info!("Starting background job runner");

        if let Some(job) = self.poll {
            let job = match &self.shutdown {
                Some(token) => job.with_cancellation(token.clone()),
                None => job,
            };
            Arc::new(job).start().await;
        }

        if let Some(job) = self.cache_sweep {
            let job = match &self.shutdown {
                Some(token) => job.with_cancellation(token.clone()),
                None => job,
            };
            Arc::new(job).start().await;
        }

        if let Some(job) = self.signature_snapshot {
            let job = match &self.shutdown {
                Some(token) => job.with_cancellation(token.clone()),
                None => job,
            };
            Arc::new(job).start().await;
        }

        info!("All background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
