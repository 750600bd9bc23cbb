use std::sync::atomic::{AtomicU64, Ordering};
use warden_dns_domain::VerdictSource;

/// Commit counters behind the autonomy score: how much of the verdict
/// stream was decided locally versus by the cloud reasoning tier.
#[derive(Default)]
pub struct DecisionCounters {
    local: AtomicU64,
    cloud: AtomicU64,
    poll_dropped: AtomicU64,
}

impl DecisionCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, source: VerdictSource) {
        if source.is_local() {
            self.local.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cloud.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn note_poll_dropped(&self, count: u64) {
        self.poll_dropped.fetch_add(count, Ordering::Relaxed);
    }

    pub fn local(&self) -> u64 {
        self.local.load(Ordering::Relaxed)
    }

    pub fn cloud(&self) -> u64 {
        self.cloud.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        self.local() + self.cloud()
    }

    pub fn poll_dropped(&self) -> u64 {
        self.poll_dropped.load(Ordering::Relaxed)
    }

    /// Local share of all decisions; 0.0 before the first commit.
    pub fn autonomy_score(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.local() as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autonomy_score() {
        let counters = DecisionCounters::new();
        assert_eq!(counters.autonomy_score(), 0.0);

        counters.record(VerdictSource::Heuristic);
        counters.record(VerdictSource::Cache);
        counters.record(VerdictSource::Metadata);
        counters.record(VerdictSource::Reasoning);

        assert_eq!(counters.local(), 3);
        assert_eq!(counters.cloud(), 1);
        assert_eq!(counters.total(), 4);
        assert!((counters.autonomy_score() - 0.75).abs() < 1e-9);
    }
}
