use crate::services::signature_store::SignatureStore;
use std::sync::Arc;
use tracing::debug;
use warden_dns_domain::{SignatureKey, Verdict, VerdictSource};

/// Confidence attributed to a reasoning verdict when it is folded back
/// into the signature store.
const REASONING_CONFIDENCE: f64 = 0.9;

/// Metadata verdicts below this confidence are not worth reinforcing.
const METADATA_LEARN_FLOOR: f64 = 0.9;

/// Observes committed verdicts and writes confirmed classifications back
/// into the signature store. Only called after a verdict has reached the
/// buffer; only reasoning and high-confidence metadata verdicts qualify.
pub struct PatternLearner {
    store: Arc<SignatureStore>,
}

impl PatternLearner {
    pub fn new(store: Arc<SignatureStore>) -> Self {
        Self { store }
    }

    pub fn observe(&self, verdict: &Verdict, metadata_confidence: Option<f64>) {
        let observed_confidence = match verdict.source {
            VerdictSource::Reasoning => REASONING_CONFIDENCE,
            VerdictSource::Metadata => match metadata_confidence {
                Some(confidence) if confidence >= METADATA_LEARN_FLOOR => confidence,
                _ => return,
            },
            _ => return,
        };

        let Some(meta) = &verdict.upstream_meta else {
            // Manual requests carry no upstream metadata to key on.
            return;
        };

        let key = SignatureKey::from_meta(meta);
        self.store.apply(
            key,
            verdict.category,
            verdict.risk,
            observed_confidence,
            verdict.decided_at,
        );
        debug!(
            domain = %verdict.domain,
            source = %verdict.source,
            confidence = observed_confidence,
            "Signature reinforced"
        );
    }

    pub fn learned_patterns(&self) -> usize {
        self.store.len()
    }
}
