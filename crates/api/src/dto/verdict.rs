use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warden_dns_domain::Verdict;

#[derive(Debug, Clone, Serialize)]
pub struct VerdictResponse {
    pub domain: String,
    pub risk: String,
    pub category: String,
    pub summary: String,
    pub is_anomaly: bool,
    pub anomaly_score: f64,
    pub entropy: f64,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<UpstreamMetaResponse>,
    pub decided_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpstreamMetaResponse {
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
}

impl From<&Verdict> for VerdictResponse {
    fn from(verdict: &Verdict) -> Self {
        Self {
            domain: verdict.domain.to_string(),
            risk: verdict.risk.as_str().to_string(),
            category: verdict.category.as_str().to_string(),
            summary: verdict.summary.clone(),
            is_anomaly: verdict.is_anomaly,
            anomaly_score: verdict.anomaly_score,
            entropy: verdict.entropy,
            source: verdict.source.as_str().to_string(),
            upstream: verdict.upstream_meta.as_ref().map(|meta| UpstreamMetaResponse {
                reason: meta.reason.as_str().to_string(),
                rule: meta.rule.as_deref().map(str::to_string),
                filter_id: meta.filter_id,
                client: meta.client.as_deref().map(str::to_string),
            }),
            decided_at: verdict.decided_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub domain: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}
