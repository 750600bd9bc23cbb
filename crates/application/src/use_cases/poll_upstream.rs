use crate::ports::UpstreamLogPort;
use crate::services::{
    AnalysisJob, AnalysisScheduler, DecisionCounters, Deduplicator, RequestOrigin, VerdictCache,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use warden_dns_domain::{DomainError, DomainFingerprint, UpstreamMeta};

/// Outcome of one poll tick, for logging and tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickSummary {
    pub fetched: usize,
    pub admitted: usize,
    pub deduplicated: usize,
    pub invalid: usize,
    pub dropped: usize,
    pub skipped: bool,
}

/// One poll tick: fetch the recent sinkhole log, advance the high-water
/// mark, validate and deduplicate, enqueue survivors for analysis. A tick
/// that overlaps a still-running one is skipped, never stacked.
pub struct PollUpstreamUseCase {
    upstream: Arc<dyn UpstreamLogPort>,
    dedup: Arc<Deduplicator>,
    cache: Arc<VerdictCache>,
    scheduler: Arc<AnalysisScheduler>,
    counters: Arc<DecisionCounters>,
    batch_limit: usize,
    high_water: Mutex<Option<DateTime<Utc>>>,
    tick_guard: Mutex<()>,
}

impl PollUpstreamUseCase {
    pub fn new(
        upstream: Arc<dyn UpstreamLogPort>,
        dedup: Arc<Deduplicator>,
        cache: Arc<VerdictCache>,
        scheduler: Arc<AnalysisScheduler>,
        counters: Arc<DecisionCounters>,
        batch_limit: usize,
    ) -> Self {
        Self {
            upstream,
            dedup,
            cache,
            scheduler,
            counters,
            batch_limit,
            high_water: Mutex::new(None),
            tick_guard: Mutex::new(()),
        }
    }

    pub async fn execute(&self) -> Result<TickSummary, DomainError> {
        let Ok(_tick) = self.tick_guard.try_lock() else {
            debug!("Previous poll tick still running, skipping");
            return Ok(TickSummary {
                skipped: true,
                ..TickSummary::default()
            });
        };

        let events = self.upstream.fetch_recent(self.batch_limit).await?;
        let mut summary = TickSummary {
            fetched: events.len(),
            ..TickSummary::default()
        };

        // High-water mark: never re-enqueue events at or before the last
        // processed timestamp (defense in depth next to the dedup window).
        let mut high_water = self.high_water.lock().await;
        let floor = *high_water;

        for event in events {
            if floor.map_or(false, |f| event.answered_at <= f) {
                continue;
            }
            if high_water.map_or(true, |hw| event.answered_at > hw) {
                *high_water = Some(event.answered_at);
            }

            let fingerprint = match DomainFingerprint::parse(&event.domain) {
                Ok(fp) => fp,
                Err(e) => {
                    summary.invalid += 1;
                    debug!(domain = %event.domain, error = %e, "Dropping invalid upstream domain");
                    continue;
                }
            };

            let domain = fingerprint.as_arc();
            if !self.dedup.admit(&domain) {
                summary.deduplicated += 1;
                continue;
            }
            if self.cache.lookup(fingerprint.as_str()).await.is_some() {
                // Recently decided; the slot goes back untouched.
                self.dedup.abort(&domain);
                summary.deduplicated += 1;
                continue;
            }

            let job = AnalysisJob {
                fingerprint,
                meta: Some(UpstreamMeta::from(&event)),
                origin: RequestOrigin::Polled,
                note: None,
                reply: None,
            };

            if self.scheduler.enqueue_polled(job) {
                summary.admitted += 1;
            } else {
                self.dedup.abort(&domain);
                summary.dropped += 1;
            }
        }

        if summary.dropped > 0 {
            self.counters.note_poll_dropped(summary.dropped as u64);
            warn!(poll_dropped = summary.dropped, "Worker pool saturated, dropped events");
        }

        info!(
            fetched = summary.fetched,
            admitted = summary.admitted,
            deduplicated = summary.deduplicated,
            invalid = summary.invalid,
            "Poll tick complete"
        );
        Ok(summary)
    }
}
