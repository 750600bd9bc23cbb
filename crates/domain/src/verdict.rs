use crate::upstream_event::UpstreamMeta;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Total risk ordering: Unknown < Low < Medium < High < Critical.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum RiskLevel {
    #[default]
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Unknown => "Unknown",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }

    /// Maps a 1..=10 reasoning risk score onto the level scale.
    pub fn from_score(score: u8) -> Self {
        match score {
            1..=3 => RiskLevel::Low,
            4..=6 => RiskLevel::Medium,
            7..=8 => RiskLevel::High,
            9..=10 => RiskLevel::Critical,
            _ => RiskLevel::Unknown,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ThreatCategory {
    Tracker,
    Advertising,
    Malware,
    System,
    Privacy,
    ZeroDaySuspect,
    #[default]
    Unknown,
}

impl ThreatCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatCategory::Tracker => "Tracker",
            ThreatCategory::Advertising => "Advertising",
            ThreatCategory::Malware => "Malware",
            ThreatCategory::System => "System",
            ThreatCategory::Privacy => "Privacy",
            ThreatCategory::ZeroDaySuspect => "Zero-Day Suspect",
            ThreatCategory::Unknown => "Unknown",
        }
    }

    /// Parses the reasoning service's category vocabulary, which is
    /// exactly {Ad, Tracker, Malware, Unknown}. Anything outside it
    /// collapses to Unknown; Privacy and System are assigned only by the
    /// local tiers.
    pub fn from_reasoning(raw: &str) -> Self {
        match raw {
            "Ad" => ThreatCategory::Advertising,
            "Tracker" => ThreatCategory::Tracker,
            "Malware" => ThreatCategory::Malware,
            _ => ThreatCategory::Unknown,
        }
    }
}

impl std::fmt::Display for ThreatCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which tier produced a verdict. Set exactly once at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerdictSource {
    Cache,
    Metadata,
    Heuristic,
    Anomaly,
    Reasoning,
    Fallback,
}

impl VerdictSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictSource::Cache => "cache",
            VerdictSource::Metadata => "metadata",
            VerdictSource::Heuristic => "heuristic",
            VerdictSource::Anomaly => "anomaly",
            VerdictSource::Reasoning => "reasoning",
            VerdictSource::Fallback => "fallback",
        }
    }

    /// Everything except the remote reasoning tier counts as a local
    /// decision for the autonomy ratio.
    pub fn is_local(&self) -> bool {
        !matches!(self, VerdictSource::Reasoning)
    }
}

impl std::fmt::Display for VerdictSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The final classification record for one domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub domain: Arc<str>,
    pub risk: RiskLevel,
    pub category: ThreatCategory,
    pub summary: String,
    pub is_anomaly: bool,
    pub anomaly_score: f64,
    pub entropy: f64,
    pub source: VerdictSource,
    pub upstream_meta: Option<UpstreamMeta>,
    pub decided_at: DateTime<Utc>,
}

impl Verdict {
    /// Re-emission of a cached verdict: same decision, source rewritten to
    /// Cache so the committed record names the tier that actually answered.
    pub fn as_cache_hit(&self) -> Self {
        let mut v = self.clone();
        v.source = VerdictSource::Cache;
        v
    }
}
