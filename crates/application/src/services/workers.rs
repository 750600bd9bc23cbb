use crate::services::orchestrator::AnalysisOrchestrator;
use crate::services::scheduler::AnalysisScheduler;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Spawns the bounded worker pool. Each worker pulls from the two-queue
/// scheduler and runs one analysis at a time; cancellation is observed
/// between jobs so a running analysis always commits before shutdown.
pub fn spawn_workers(
    scheduler: Arc<AnalysisScheduler>,
    orchestrator: Arc<AnalysisOrchestrator>,
    count: usize,
    shutdown: CancellationToken,
) -> Vec<JoinHandle<()>> {
    info!(workers = count, "Starting analysis worker pool");

    (0..count.max(1))
        .map(|worker_id| {
            let scheduler = Arc::clone(&scheduler);
            let orchestrator = Arc::clone(&orchestrator);
            let shutdown = shutdown.clone();

            tokio::spawn(async move {
                loop {
                    let job = tokio::select! {
                        _ = shutdown.cancelled() => break,
                        job = scheduler.next() => job,
                    };

                    let verdict = orchestrator
                        .analyze(&job.fingerprint, job.meta, job.origin, job.note)
                        .await;

                    if let Some(reply) = job.reply {
                        // Caller may have timed out and gone away.
                        let _ = reply.send(verdict);
                    }
                }
                debug!(worker_id, "Analysis worker stopped");
            })
        })
        .collect()
}
