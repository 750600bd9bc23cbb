use async_trait::async_trait;
use warden_dns_domain::{DomainError, DomainFeatures, UpstreamMeta};

/// Why the orchestrator escalated past the local tiers. Included in the
/// reasoning prompt so the analyst knows what tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationHint {
    Privacy,
    Anomaly,
}

impl EscalationHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            EscalationHint::Privacy => "privacy-sensitive name",
            EscalationHint::Anomaly => "statistical outlier",
        }
    }
}

/// Compact feature bundle sent to the remote analyst.
#[derive(Debug, Clone)]
pub struct ReasoningRequest {
    pub domain: String,
    pub features: DomainFeatures,
    pub anomaly_score: f64,
    pub upstream_meta: Option<UpstreamMeta>,
    pub hint: Option<EscalationHint>,
    /// Free-form operator note from a manual request; drives the
    /// JIT-context keyword check on the client side.
    pub operator_note: Option<String>,
}

/// A schema-validated response from the reasoning service. The adapter
/// rejects out-of-range scores and unknown shapes before this is built.
#[derive(Debug, Clone)]
pub struct ReasoningAssessment {
    pub risk_score: u8,
    pub category: String,
    pub explanation: String,
    pub recommended_action: String,
}

#[async_trait]
pub trait ReasoningPort: Send + Sync {
    async fn assess(&self, request: &ReasoningRequest) -> Result<ReasoningAssessment, DomainError>;
}
