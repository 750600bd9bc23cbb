use crate::ports::{
    EscalationHint, LedgerPort, LedgerRow, ReasoningPort, ReasoningRequest,
};
use crate::services::anomaly::AnomalyEngine;
use crate::services::circuit_breaker::{CallPermit, CircuitBreaker};
use crate::services::counters::DecisionCounters;
use crate::services::deduplicator::Deduplicator;
use crate::services::heuristics::{HeuristicEngine, HeuristicOutcome};
use crate::services::metadata::{MetadataClassifier, MetadataOutcome};
use crate::services::pattern_learner::PatternLearner;
use crate::services::scheduler::RequestOrigin;
use crate::services::verdict_buffer::VerdictBuffer;
use crate::services::verdict_cache::VerdictCache;
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, error, warn};
use warden_dns_domain::{
    DomainFeatures, DomainFingerprint, RiskLevel, ThreatCategory, UpstreamMeta, Verdict,
    VerdictSource,
};

/// The strongest lower-tier result, kept as the fallback body in case the
/// reasoning tier cannot answer.
#[derive(Debug, Clone)]
struct TierCandidate {
    risk: RiskLevel,
    category: ThreatCategory,
    summary: String,
    source: VerdictSource,
}

/// Sequences the analysis tiers for one domain and owns the commit path:
/// cache store, buffer append, subscriber push, ledger hand-off, pattern
/// learning, in-flight release. Every valid domain that enters produces
/// exactly one committed verdict.
pub struct AnalysisOrchestrator {
    cache: Arc<VerdictCache>,
    dedup: Arc<Deduplicator>,
    metadata: Arc<MetadataClassifier>,
    heuristics: Arc<HeuristicEngine>,
    anomaly: Arc<AnomalyEngine>,
    breaker: Arc<CircuitBreaker>,
    reasoning: Option<Arc<dyn ReasoningPort>>,
    ledger: Option<Arc<dyn LedgerPort>>,
    learner: Arc<PatternLearner>,
    buffer: Arc<VerdictBuffer>,
    counters: Arc<DecisionCounters>,
    domain_budget: Duration,
    reasoning_timeout: Duration,
    ledger_retry_limit: u32,
}

#[allow(clippy::too_many_arguments)]
impl AnalysisOrchestrator {
    pub fn new(
        cache: Arc<VerdictCache>,
        dedup: Arc<Deduplicator>,
        metadata: Arc<MetadataClassifier>,
        heuristics: Arc<HeuristicEngine>,
        anomaly: Arc<AnomalyEngine>,
        breaker: Arc<CircuitBreaker>,
        reasoning: Option<Arc<dyn ReasoningPort>>,
        ledger: Option<Arc<dyn LedgerPort>>,
        learner: Arc<PatternLearner>,
        buffer: Arc<VerdictBuffer>,
        counters: Arc<DecisionCounters>,
        domain_budget: Duration,
        reasoning_timeout: Duration,
        ledger_retry_limit: u32,
    ) -> Self {
        Self {
            cache,
            dedup,
            metadata,
            heuristics,
            anomaly,
            breaker,
            reasoning,
            ledger,
            learner,
            buffer,
            counters,
            domain_budget,
            reasoning_timeout,
            ledger_retry_limit,
        }
    }

    /// Runs the tier sequence for one validated domain. Polled domains
    /// arrive with their in-flight slot already claimed by admission;
    /// manual requests claim it here.
    pub async fn analyze(
        &self,
        fingerprint: &DomainFingerprint,
        meta: Option<UpstreamMeta>,
        origin: RequestOrigin,
        note: Option<String>,
    ) -> Arc<Verdict> {
        let started = Instant::now();
        let domain = fingerprint.as_arc();

        // Tier 1: cache.
        if let Some(cached) = self.cache.lookup(fingerprint.as_str()).await {
            debug!(domain = %domain, "Cache hit, re-emitting verdict");
            let in_flight = origin == RequestOrigin::Polled;
            return self
                .commit(cached.as_cache_hit(), None, origin, in_flight)
                .await;
        }

        if origin == RequestOrigin::Manual {
            self.dedup.begin(&domain);
        }

        let features = DomainFeatures::extract(fingerprint.as_str());
        self.heuristics.observe(features.entropy);

        let mut escalation: Option<EscalationHint> = None;
        let mut candidate: Option<TierCandidate> = None;
        let mut metadata_confidence = None;

        // Tier 2: metadata.
        match self.metadata.classify(fingerprint.as_str(), meta.as_ref()) {
            MetadataOutcome::Conclusive {
                risk,
                category,
                confidence,
                summary,
                escalate_privacy,
            } => {
                metadata_confidence = Some(confidence);
                if !escalate_privacy {
                    let verdict = self.build(
                        &domain,
                        risk,
                        category,
                        summary,
                        VerdictSource::Metadata,
                        &features,
                        0.0,
                        false,
                        meta,
                    );
                    return self.commit(verdict, metadata_confidence, origin, true).await;
                }
                escalation = Some(EscalationHint::Privacy);
                // Degraded commits for privacy names land as Fallback.
                candidate = Some(TierCandidate {
                    risk,
                    category,
                    summary,
                    source: VerdictSource::Fallback,
                });
            }
            MetadataOutcome::Inconclusive => {}
        }

        // Tier 3: heuristics. Tier 4 scores first so escalation state is
        // known before deciding whether a conclusive heuristic commits.
        let heuristic = self.heuristics.evaluate(&features);
        let (anomaly_score, is_anomaly) = self.anomaly.evaluate(&features);
        self.anomaly.fit_incremental(&features);

        if is_anomaly && escalation.is_none() {
            escalation = Some(EscalationHint::Anomaly);
        }

        if let HeuristicOutcome::Conclusive {
            risk,
            category,
            summary,
        } = heuristic
        {
            if escalation.is_none() {
                let verdict = self.build(
                    &domain,
                    risk,
                    category,
                    summary,
                    VerdictSource::Heuristic,
                    &features,
                    anomaly_score,
                    false,
                    meta,
                );
                return self.commit(verdict, metadata_confidence, origin, true).await;
            }
            if candidate.as_ref().map_or(true, |c| risk > c.risk) {
                candidate = Some(TierCandidate {
                    risk,
                    category,
                    summary,
                    source: VerdictSource::Heuristic,
                });
            }
        }

        if is_anomaly && candidate.as_ref().map_or(true, |c| c.risk < RiskLevel::High) {
            candidate = Some(TierCandidate {
                risk: RiskLevel::High,
                category: ThreatCategory::ZeroDaySuspect,
                summary: format!(
                    "Feature vector is an outlier against recent traffic (score {anomaly_score:.3})"
                ),
                source: VerdictSource::Anomaly,
            });
        }

        // Tier 5: reasoning, breaker permitting and budget remaining.
        let budget_left = self.domain_budget.checked_sub(started.elapsed());
        if let (Some(reasoning), Some(_)) = (&self.reasoning, budget_left) {
            let permit = self.breaker.try_acquire();
            if permit != CallPermit::Denied {
                let request = ReasoningRequest {
                    domain: fingerprint.as_str().to_string(),
                    features: features.clone(),
                    anomaly_score,
                    upstream_meta: meta.clone(),
                    hint: escalation,
                    operator_note: note,
                };
                match timeout(self.reasoning_timeout, reasoning.assess(&request)).await {
                    Ok(Ok(assessment)) => {
                        self.breaker.record_success();
                        let verdict = self.build(
                            &domain,
                            RiskLevel::from_score(assessment.risk_score),
                            ThreatCategory::from_reasoning(&assessment.category),
                            assessment.explanation,
                            VerdictSource::Reasoning,
                            &features,
                            anomaly_score,
                            is_anomaly,
                            meta,
                        );
                        return self.commit(verdict, metadata_confidence, origin, true).await;
                    }
                    Ok(Err(e)) => {
                        self.breaker.record_failure();
                        warn!(domain = %domain, error = %e, "Reasoning call failed");
                    }
                    Err(_) => {
                        self.breaker.record_failure();
                        warn!(domain = %domain, "Reasoning call timed out");
                    }
                }
            }
        }

        // Degraded terminal: best lower tier, or a low-risk fallback.
        let verdict = match candidate {
            Some(c) => {
                let summary = format!("{} (degraded: reasoning unavailable)", c.summary);
                self.build(
                    &domain,
                    c.risk,
                    c.category,
                    summary,
                    c.source,
                    &features,
                    anomaly_score,
                    is_anomaly,
                    meta,
                )
            }
            None => self.build(
                &domain,
                RiskLevel::Low,
                ThreatCategory::Unknown,
                "No conclusive local signal; reasoning unavailable (degraded mode)".to_string(),
                VerdictSource::Fallback,
                &features,
                anomaly_score,
                is_anomaly,
                meta,
            ),
        };
        self.commit(verdict, metadata_confidence, origin, true).await
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        &self,
        domain: &Arc<str>,
        risk: RiskLevel,
        category: ThreatCategory,
        summary: String,
        source: VerdictSource,
        features: &DomainFeatures,
        anomaly_score: f64,
        is_anomaly: bool,
        meta: Option<UpstreamMeta>,
    ) -> Verdict {
        Verdict {
            domain: Arc::clone(domain),
            risk,
            category,
            summary,
            is_anomaly,
            anomaly_score,
            entropy: features.entropy,
            source,
            upstream_meta: meta,
            decided_at: Utc::now(),
        }
    }

    /// Commit effects in order: cache store, counters, buffer append and
    /// push, ledger hand-off, pattern learning, in-flight release.
    async fn commit(
        &self,
        verdict: Verdict,
        metadata_confidence: Option<f64>,
        origin: RequestOrigin,
        in_flight: bool,
    ) -> Arc<Verdict> {
        let verdict = Arc::new(verdict);

        self.cache.store(&verdict);
        self.counters.record(verdict.source);
        self.buffer
            .push(Arc::clone(&verdict), origin == RequestOrigin::Manual);

        if let Some(ledger) = &self.ledger {
            self.spawn_ledger_append(Arc::clone(ledger), LedgerRow::from(&*verdict));
        }

        // Invariant: the learner only sees verdicts already in the buffer.
        self.learner.observe(&verdict, metadata_confidence);

        if in_flight {
            self.dedup.finish(&verdict.domain);
        }

        debug!(
            domain = %verdict.domain,
            source = %verdict.source,
            risk = %verdict.risk,
            "Verdict committed"
        );
        verdict
    }

    fn spawn_ledger_append(&self, ledger: Arc<dyn LedgerPort>, row: LedgerRow) {
        let retry_limit = self.ledger_retry_limit;
        tokio::spawn(async move {
            let mut delay = Duration::from_millis(500);
            for attempt in 0..=retry_limit {
                match ledger.append(&row).await {
                    Ok(()) => return,
                    Err(e) if attempt < retry_limit => {
                        warn!(domain = %row.domain, attempt, error = %e, "Ledger append retry");
                        tokio::time::sleep(delay).await;
                        delay *= 2;
                    }
                    Err(e) => {
                        error!(domain = %row.domain, error = %e, "Ledger append gave up");
                    }
                }
            }
        });
    }
}
