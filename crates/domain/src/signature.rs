use crate::upstream_event::{ClientClass, FilterReason, UpstreamMeta};
use crate::verdict::{RiskLevel, ThreatCategory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Longest rule prefix retained in a signature key. Adblock rules share
/// long common tails; the prefix is what discriminates.
const RULE_PREFIX_LEN: usize = 24;

/// Normalizes an upstream filter rule into its signature prefix: adblock
/// anchors stripped, truncated to a fixed length.
pub fn rule_prefix(rule: &str) -> Arc<str> {
    let stripped = rule.trim_start_matches("||").trim_start_matches('|');
    let mut prefix = String::with_capacity(RULE_PREFIX_LEN);
    for (taken, c) in stripped.chars().enumerate() {
        if taken == RULE_PREFIX_LEN || matches!(c, '^' | '$' | '*') {
            break;
        }
        prefix.push(c);
    }
    Arc::from(prefix.as_str())
}

/// One point in the partition of upstream metadata space. Lookup probes
/// keys at decreasing specificity via [`SignatureKey::fallbacks`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignatureKey {
    pub reason: FilterReason,
    pub filter_id: Option<i64>,
    pub rule_prefix: Option<Arc<str>>,
    pub client_class: ClientClass,
}

impl SignatureKey {
    pub fn from_meta(meta: &UpstreamMeta) -> Self {
        Self {
            reason: meta.reason.clone(),
            filter_id: meta.filter_id,
            rule_prefix: meta.rule.as_deref().map(rule_prefix),
            client_class: meta.client_class(),
        }
    }

    /// Probe sequence: exact -> (reason, rule_prefix) -> (reason).
    pub fn fallbacks(&self) -> [SignatureKey; 3] {
        [
            self.clone(),
            SignatureKey {
                reason: self.reason.clone(),
                filter_id: None,
                rule_prefix: self.rule_prefix.clone(),
                client_class: ClientClass::Unknown,
            },
            SignatureKey {
                reason: self.reason.clone(),
                filter_id: None,
                rule_prefix: None,
                client_class: ClientClass::Unknown,
            },
        ]
    }
}

/// A learned upstream-metadata -> verdict mapping. Mutated only by the
/// pattern learner; read by the metadata classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signature {
    pub key: SignatureKey,
    pub category: ThreatCategory,
    pub risk: RiskLevel,
    pub confidence: f64,
    pub hits: u64,
    pub last_seen: DateTime<Utc>,
}

impl Signature {
    pub fn new(
        key: SignatureKey,
        category: ThreatCategory,
        risk: RiskLevel,
        confidence: f64,
        last_seen: DateTime<Utc>,
    ) -> Self {
        Self {
            key,
            category,
            risk,
            confidence: confidence.clamp(0.0, 1.0),
            hits: 1,
            last_seen,
        }
    }
}

fn seed(reason: &str, category: ThreatCategory, risk: RiskLevel, confidence: f64) -> Signature {
    Signature {
        key: SignatureKey {
            reason: FilterReason::new(reason),
            filter_id: None,
            rule_prefix: None,
            client_class: ClientClass::Unknown,
        },
        category,
        risk,
        confidence,
        hits: 0,
        last_seen: DateTime::<Utc>::MIN_UTC,
    }
}

/// Baseline signature set used when no snapshot exists on disk. Covers the
/// well-known sinkhole filter reasons so the first boot is not blind.
pub fn baseline_signatures() -> Vec<Signature> {
    vec![
        seed(
            "FilteredBlackList",
            ThreatCategory::Advertising,
            RiskLevel::Medium,
            0.80,
        ),
        seed(
            "FilteredSafeBrowsing",
            ThreatCategory::Malware,
            RiskLevel::High,
            0.95,
        ),
        seed(
            "FilteredParental",
            ThreatCategory::System,
            RiskLevel::Low,
            0.85,
        ),
        seed(
            "FilteredBlockedService",
            ThreatCategory::System,
            RiskLevel::Low,
            0.85,
        ),
        seed(
            "NotFilteredWhiteList",
            ThreatCategory::System,
            RiskLevel::Low,
            0.90,
        ),
    ]
}
