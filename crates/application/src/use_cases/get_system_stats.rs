use crate::services::{
    AnomalyEngine, CircuitBreaker, DecisionCounters, HeuristicEngine, SignatureStore,
    VerdictBuffer, VerdictCache,
};
use std::sync::Arc;
use warden_dns_domain::{SystemStats, ThresholdStats};

/// Assembles the diagnostic counter snapshot for `/api/stats/system`.
pub struct GetSystemStatsUseCase {
    counters: Arc<DecisionCounters>,
    cache: Arc<VerdictCache>,
    anomaly: Arc<AnomalyEngine>,
    heuristics: Arc<HeuristicEngine>,
    signatures: Arc<SignatureStore>,
    breaker: Arc<CircuitBreaker>,
    buffer: Arc<VerdictBuffer>,
    metadata_threshold: f64,
}

impl GetSystemStatsUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        counters: Arc<DecisionCounters>,
        cache: Arc<VerdictCache>,
        anomaly: Arc<AnomalyEngine>,
        heuristics: Arc<HeuristicEngine>,
        signatures: Arc<SignatureStore>,
        breaker: Arc<CircuitBreaker>,
        buffer: Arc<VerdictBuffer>,
        metadata_threshold: f64,
    ) -> Self {
        Self {
            counters,
            cache,
            anomaly,
            heuristics,
            signatures,
            breaker,
            buffer,
            metadata_threshold,
        }
    }

    pub fn execute(&self) -> SystemStats {
        SystemStats {
            autonomy_score: self.counters.autonomy_score(),
            local_decisions: self.counters.local(),
            cloud_decisions: self.counters.cloud(),
            total_decisions: self.counters.total(),
            learned_patterns: self.signatures.len(),
            breaker_state: self.breaker.state().as_str().to_string(),
            poll_dropped: self.counters.poll_dropped(),
            subscriber_dropped: self.buffer.subscriber_dropped(),
            cache_stats: self.cache.stats(),
            anomaly_engine_stats: self.anomaly.stats(),
            thresholds: ThresholdStats {
                entropy_threshold: self.heuristics.entropy_threshold(),
                anomaly_threshold: self.anomaly.threshold(),
                metadata_threshold: self.metadata_threshold,
            },
        }
    }
}
