use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use warden_dns_application::ports::{ReasoningAssessment, ReasoningPort, ReasoningRequest};
use warden_dns_domain::config::ReasoningConfig;
use warden_dns_domain::DomainError;

/// Categories the reasoning schema allows. Anything else is a schema
/// violation and counts against the circuit breaker.
const ALLOWED_CATEGORIES: &[&str] = &["Ad", "Tracker", "Malware", "Unknown"];

/// Keywords that mark an operator note as an architectural question; only
/// those requests carry the full system-context prose. Everything else
/// gets the compact analysis prompt (cost shaping, not correctness).
const ARCHITECTURE_KEYWORDS: &[&str] = &[
    "architecture",
    "design",
    "structure",
    "overview",
    "how does",
    "why does",
];

const SYSTEM_CONTEXT: &str = "You are the reasoning tier of a local DNS observability \
pipeline. Domains reach you only after the cache, metadata, heuristic and anomaly \
tiers declined to answer or flagged an escalation. Judge the single domain in the \
request using the attached features and upstream filter metadata.";

fn needs_full_context(note: &str) -> bool {
    let lowered = note.to_lowercase();
    ARCHITECTURE_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

#[derive(Debug, Serialize)]
struct AssessmentRequestWire<'a> {
    domain: &'a str,
    features: FeaturesWire,
    anomaly_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    upstream: Option<UpstreamWire<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct FeaturesWire {
    length: usize,
    entropy: f64,
    digit_ratio: f64,
    vowel_ratio: f64,
    tld_weight: f64,
}

#[derive(Debug, Serialize)]
struct UpstreamWire<'a> {
    reason: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct AssessmentResponseWire {
    risk_score: i64,
    category: String,
    explanation: String,
    #[serde(default)]
    recommended_action: String,
}

/// HTTPS client for the remote reasoning analyst.
pub struct ReasoningClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl ReasoningClient {
    /// Returns None when no API key is configured; the tier is disabled
    /// and the pipeline runs degraded.
    pub fn from_config(config: &ReasoningConfig) -> Result<Option<Self>, DomainError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let client = reqwest::Client::builder()
            .user_agent("warden-dns/0.4 (reasoning)")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::ReasoningUnavailable(e.to_string()))?;

        Ok(Some(Self {
            client,
            url: config.url.clone(),
            api_key,
        }))
    }

    fn validate(wire: AssessmentResponseWire) -> Result<ReasoningAssessment, DomainError> {
        if !(1..=10).contains(&wire.risk_score) {
            return Err(DomainError::ReasoningSchemaViolation(format!(
                "risk_score {} outside 1..=10",
                wire.risk_score
            )));
        }
        if !ALLOWED_CATEGORIES.contains(&wire.category.as_str()) {
            return Err(DomainError::ReasoningSchemaViolation(format!(
                "unknown category '{}'",
                wire.category
            )));
        }

        Ok(ReasoningAssessment {
            risk_score: wire.risk_score as u8,
            category: wire.category,
            explanation: wire.explanation,
            recommended_action: wire.recommended_action,
        })
    }
}

#[async_trait]
impl ReasoningPort for ReasoningClient {
    async fn assess(&self, request: &ReasoningRequest) -> Result<ReasoningAssessment, DomainError> {
        let context = request
            .operator_note
            .as_deref()
            .filter(|note| needs_full_context(note))
            .map(|_| SYSTEM_CONTEXT);

        let body = AssessmentRequestWire {
            domain: &request.domain,
            features: FeaturesWire {
                length: request.features.length,
                entropy: request.features.entropy,
                digit_ratio: request.features.digit_ratio,
                vowel_ratio: request.features.vowel_ratio,
                tld_weight: request.features.tld_weight,
            },
            anomaly_score: request.anomaly_score,
            upstream: request.upstream_meta.as_ref().map(|meta| UpstreamWire {
                reason: meta.reason.as_str(),
                rule: meta.rule.as_deref(),
                filter_id: meta.filter_id,
            }),
            hint: request.hint.map(|h| h.as_str()),
            context,
        };

        debug!(domain = %request.domain, full_context = context.is_some(), "Reasoning call");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::ReasoningUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::ReasoningUnavailable(format!(
                "HTTP {}",
                status.as_u16()
            )));
        }

        let wire: AssessmentResponseWire = response
            .json()
            .await
            .map_err(|e| DomainError::ReasoningSchemaViolation(e.to_string()))?;

        Self::validate(wire)
    }
}
