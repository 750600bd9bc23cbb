#![allow(dead_code)]

pub mod mock_ports;

use self::mock_ports::{MockLedgerPort, MockReasoningPort};
use std::sync::Arc;
use std::time::Duration;
use warden_dns_application::services::{
    AnalysisOrchestrator, AnomalyEngine, CircuitBreaker, DecisionCounters, Deduplicator,
    HeuristicEngine, MetadataClassifier, PatternLearner, SignatureStore, VerdictBuffer,
    VerdictCache,
};
use warden_dns_domain::{baseline_signatures, DomainFeatures};

/// Everything a scenario test needs to reach into the pipeline.
pub struct Fixture {
    pub orchestrator: Arc<AnalysisOrchestrator>,
    pub cache: Arc<VerdictCache>,
    pub dedup: Arc<Deduplicator>,
    pub anomaly: Arc<AnomalyEngine>,
    pub heuristics: Arc<HeuristicEngine>,
    pub breaker: Arc<CircuitBreaker>,
    pub buffer: Arc<VerdictBuffer>,
    pub counters: Arc<DecisionCounters>,
    pub signatures: Arc<SignatureStore>,
    pub reasoning: Arc<MockReasoningPort>,
    pub ledger: Arc<MockLedgerPort>,
}

pub struct FixtureBuilder {
    reasoning_enabled: bool,
    entropy_threshold: f64,
    anomaly_min_samples: usize,
}

impl FixtureBuilder {
    pub fn new() -> Self {
        Self {
            reasoning_enabled: true,
            entropy_threshold: 3.0,
            anomaly_min_samples: 10,
        }
    }

    pub fn without_reasoning(mut self) -> Self {
        self.reasoning_enabled = false;
        self
    }

    pub fn entropy_threshold(mut self, threshold: f64) -> Self {
        self.entropy_threshold = threshold;
        self
    }

    pub fn build(self) -> Fixture {
        let cache = Arc::new(VerdictCache::new(256, Duration::from_secs(300)));
        let dedup = Arc::new(Deduplicator::new(100));
        let signatures = Arc::new(SignatureStore::new(baseline_signatures()));
        let metadata = Arc::new(MetadataClassifier::new(Arc::clone(&signatures), 0.75));
        let heuristics = Arc::new(HeuristicEngine::new(self.entropy_threshold, 500));
        let anomaly = Arc::new(AnomalyEngine::new(self.anomaly_min_samples, 1000, -0.1));
        let breaker = Arc::new(CircuitBreaker::new(
            20,
            5,
            Duration::from_secs(30),
            Duration::from_secs(300),
        ));
        let learner = Arc::new(PatternLearner::new(Arc::clone(&signatures)));
        let buffer = Arc::new(VerdictBuffer::new(200));
        let counters = Arc::new(DecisionCounters::new());
        let reasoning = Arc::new(MockReasoningPort::new());
        let ledger = Arc::new(MockLedgerPort::new());

        let orchestrator = Arc::new(AnalysisOrchestrator::new(
            Arc::clone(&cache),
            Arc::clone(&dedup),
            metadata,
            Arc::clone(&heuristics),
            Arc::clone(&anomaly),
            Arc::clone(&breaker),
            self.reasoning_enabled
                .then(|| reasoning.clone() as Arc<dyn warden_dns_application::ports::ReasoningPort>),
            Some(ledger.clone() as Arc<dyn warden_dns_application::ports::LedgerPort>),
            learner,
            Arc::clone(&buffer),
            Arc::clone(&counters),
            Duration::from_secs(5),
            Duration::from_secs(10),
            3,
        ));

        Fixture {
            orchestrator,
            cache,
            dedup,
            anomaly,
            heuristics,
            breaker,
            buffer,
            counters,
            signatures,
            reasoning,
            ledger,
        }
    }
}

impl Fixture {
    /// Feeds ordinary traffic into the anomaly engine until it is trained.
    pub fn train_anomaly(&self, samples: usize) {
        for i in 0..samples {
            let features = DomainFeatures::extract(&format!("service{}.example.com", i % 7));
            self.anomaly.fit_incremental(&features);
        }
        assert!(self.anomaly.is_trained());
    }

    pub fn open_breaker(&self) {
        for _ in 0..5 {
            self.breaker.record_failure();
        }
    }
}
