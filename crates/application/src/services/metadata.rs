use crate::services::signature_store::SignatureStore;
use aho_corasick::AhoCorasick;
use chrono::Utc;
use std::sync::Arc;
use warden_dns_domain::{RiskLevel, SignatureKey, ThreatCategory, UpstreamMeta};

/// Hardcoded priors over the bare name. These are never learned over:
/// privacy traffic always escalates to reasoning, tracker names carry a
/// fixed medium-risk classification.
const PRIVACY_KEYWORDS: &[&str] = &["geo", "location", "gps", "telemetry"];
const TRACKER_KEYWORDS: &[&str] = &["pixel", "metrics", "collect", "analytics"];
const ADVERTISING_KEYWORDS: &[&str] = &["ads", "doubleclick"];

const PRIVACY_CONFIDENCE: f64 = 0.9;
const KEYWORD_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub enum MetadataOutcome {
    Conclusive {
        risk: RiskLevel,
        category: ThreatCategory,
        confidence: f64,
        summary: String,
        /// Privacy names are always explained by the reasoning tier even
        /// when the local classification is confident.
        escalate_privacy: bool,
    },
    Inconclusive,
}

/// Classifies from upstream metadata and the name-keyword priors alone;
/// no statistical or remote work happens here.
pub struct MetadataClassifier {
    store: Arc<SignatureStore>,
    threshold: f64,
    privacy: AhoCorasick,
    tracker: AhoCorasick,
    advertising: AhoCorasick,
}

impl MetadataClassifier {
    pub fn new(store: Arc<SignatureStore>, threshold: f64) -> Self {
        Self {
            store,
            threshold,
            privacy: AhoCorasick::new(PRIVACY_KEYWORDS).expect("static pattern set"),
            tracker: AhoCorasick::new(TRACKER_KEYWORDS).expect("static pattern set"),
            advertising: AhoCorasick::new(ADVERTISING_KEYWORDS).expect("static pattern set"),
        }
    }

    pub fn classify(&self, domain: &str, meta: Option<&UpstreamMeta>) -> MetadataOutcome {
        if self.privacy.is_match(domain) {
            return MetadataOutcome::Conclusive {
                risk: RiskLevel::High,
                category: ThreatCategory::Privacy,
                confidence: PRIVACY_CONFIDENCE,
                summary: "Privacy-sensitive name (geolocation/telemetry keyword)".to_string(),
                escalate_privacy: true,
            };
        }

        if let Some(meta) = meta {
            let probes = SignatureKey::from_meta(meta).fallbacks();
            if let Some(signature) = self.store.best_match(&probes, Utc::now()) {
                if signature.confidence >= self.threshold {
                    return MetadataOutcome::Conclusive {
                        risk: signature.risk,
                        category: signature.category,
                        confidence: signature.confidence,
                        summary: format!(
                            "Matched learned signature for '{}' (confidence {:.2})",
                            signature.key.reason, signature.confidence
                        ),
                        escalate_privacy: false,
                    };
                }
            }
        }

        if self.tracker.is_match(domain) {
            return MetadataOutcome::Conclusive {
                risk: RiskLevel::Medium,
                category: ThreatCategory::Tracker,
                confidence: KEYWORD_CONFIDENCE,
                summary: "Tracking-related keyword in name".to_string(),
                escalate_privacy: false,
            };
        }

        if self.advertising.is_match(domain) {
            return MetadataOutcome::Conclusive {
                risk: RiskLevel::Medium,
                category: ThreatCategory::Advertising,
                confidence: KEYWORD_CONFIDENCE,
                summary: "Advertising-related keyword in name".to_string(),
                escalate_privacy: false,
            };
        }

        MetadataOutcome::Inconclusive
    }
}
