use async_trait::async_trait;
use chrono::SecondsFormat;
use warden_dns_domain::{DomainError, Verdict};

/// One row for the append-only ledger, columns in the sink's fixed order.
/// Writes are idempotent on `(decided_at, domain)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub decided_at: String,
    pub domain: String,
    pub risk: String,
    pub category: String,
    pub summary: String,
    pub upstream_reason: String,
    pub upstream_rule: String,
    pub is_anomaly: bool,
    pub anomaly_score: f64,
    pub entropy: f64,
}

impl From<&Verdict> for LedgerRow {
    fn from(verdict: &Verdict) -> Self {
        Self {
            decided_at: verdict
                .decided_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            domain: verdict.domain.to_string(),
            risk: verdict.risk.as_str().to_string(),
            category: verdict.category.as_str().to_string(),
            summary: verdict.summary.clone(),
            upstream_reason: verdict
                .upstream_meta
                .as_ref()
                .map(|m| m.reason.as_str().to_string())
                .unwrap_or_default(),
            upstream_rule: verdict
                .upstream_meta
                .as_ref()
                .and_then(|m| m.rule.as_deref())
                .unwrap_or_default()
                .to_string(),
            is_anomaly: verdict.is_anomaly,
            anomaly_score: verdict.anomaly_score,
            entropy: verdict.entropy,
        }
    }
}

#[async_trait]
pub trait LedgerPort: Send + Sync {
    async fn append(&self, row: &LedgerRow) -> Result<(), DomainError>;
}
