pub mod anomaly;
pub mod circuit_breaker;
pub mod counters;
pub mod deduplicator;
pub mod heuristics;
pub mod metadata;
pub mod orchestrator;
pub mod pattern_learner;
pub mod scheduler;
pub mod signature_store;
pub mod verdict_buffer;
pub mod verdict_cache;
pub mod workers;

pub use anomaly::{AnomalyEngine, IsolationForest};
pub use circuit_breaker::{BreakerState, CallPermit, CircuitBreaker};
pub use counters::DecisionCounters;
pub use deduplicator::Deduplicator;
pub use heuristics::{HeuristicEngine, HeuristicOutcome};
pub use metadata::{MetadataClassifier, MetadataOutcome};
pub use orchestrator::AnalysisOrchestrator;
pub use pattern_learner::PatternLearner;
pub use scheduler::{AnalysisJob, AnalysisScheduler, RequestOrigin};
pub use signature_store::SignatureStore;
pub use verdict_buffer::VerdictBuffer;
pub use verdict_cache::VerdictCache;
pub use workers::spawn_workers;
