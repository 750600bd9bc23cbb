use std::sync::Mutex;
use tracing::debug;
use warden_dns_domain::{DomainFeatures, RiskLevel, ThreatCategory};

/// Digit share above which a high-entropy name reads as machine-generated.
const DGA_DIGIT_RATIO: f64 = 0.3;

const THRESHOLD_PERCENTILE: f64 = 0.90;
const THRESHOLD_CLAMP: (f64, f64) = (3.0, 4.5);

#[derive(Debug, Clone, PartialEq)]
pub enum HeuristicOutcome {
    Conclusive {
        risk: RiskLevel,
        category: ThreatCategory,
        summary: String,
    },
    Inconclusive,
}

struct ThresholdState {
    entropy_threshold: f64,
    observed: Vec<f64>,
}

/// Entropy/digit/vowel signals over the bare name. The entropy threshold
/// drifts to the 90th percentile of recent traffic so unusual networks do
/// not pin every name above or below the line.
pub struct HeuristicEngine {
    state: Mutex<ThresholdState>,
    window: usize,
}

impl HeuristicEngine {
    pub fn new(initial_threshold: f64, window: usize) -> Self {
        Self {
            state: Mutex::new(ThresholdState {
                entropy_threshold: initial_threshold,
                observed: Vec::with_capacity(window.max(1)),
            }),
            window: window.max(1),
        }
    }

    /// Records one observed entropy value; every `window` observations the
    /// threshold is recomputed and the window restarts.
    pub fn observe(&self, entropy: f64) {
        let mut state = self.state.lock().unwrap();
        state.observed.push(entropy);
        if state.observed.len() < self.window {
            return;
        }

        let mut sorted = std::mem::take(&mut state.observed);
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let rank = ((sorted.len() as f64 * THRESHOLD_PERCENTILE) as usize).min(sorted.len() - 1);
        let p90 = sorted[rank];

        state.entropy_threshold = p90.clamp(THRESHOLD_CLAMP.0, THRESHOLD_CLAMP.1);
        state.observed.reserve(self.window);
        debug!(
            threshold = state.entropy_threshold,
            p90, "Entropy threshold recalibrated"
        );
    }

    pub fn entropy_threshold(&self) -> f64 {
        self.state.lock().unwrap().entropy_threshold
    }

    pub fn evaluate(&self, features: &DomainFeatures) -> HeuristicOutcome {
        let threshold = self.entropy_threshold();

        if features.entropy >= threshold {
            if features.digit_ratio >= DGA_DIGIT_RATIO {
                return HeuristicOutcome::Conclusive {
                    risk: RiskLevel::High,
                    category: ThreatCategory::Malware,
                    summary: format!(
                        "DGA-like name: entropy {:.2} >= {:.2}, digit ratio {:.2}",
                        features.entropy, threshold, features.digit_ratio
                    ),
                };
            }
            return HeuristicOutcome::Conclusive {
                risk: RiskLevel::Medium,
                category: ThreatCategory::Unknown,
                summary: format!(
                    "High-entropy name: {:.2} >= {:.2}",
                    features.entropy, threshold
                ),
            };
        }

        HeuristicOutcome::Inconclusive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dga_rule() {
        let engine = HeuristicEngine::new(3.0, 500);
        let features = DomainFeatures::extract("xhk92-z1-kq4.ru");
        match engine.evaluate(&features) {
            HeuristicOutcome::Conclusive { risk, category, .. } => {
                assert_eq!(risk, RiskLevel::High);
                assert_eq!(category, ThreatCategory::Malware);
            }
            HeuristicOutcome::Inconclusive => panic!("expected conclusive"),
        }
    }

    #[test]
    fn test_entropy_only_is_medium_unknown() {
        let engine = HeuristicEngine::new(3.0, 500);
        // High alphabet spread, no digits.
        let features = DomainFeatures::extract("qwertzuiopasdfgh.com");
        match engine.evaluate(&features) {
            HeuristicOutcome::Conclusive { risk, category, .. } => {
                assert_eq!(risk, RiskLevel::Medium);
                assert_eq!(category, ThreatCategory::Unknown);
            }
            HeuristicOutcome::Inconclusive => panic!("expected conclusive"),
        }
    }

    #[test]
    fn test_low_entropy_is_inconclusive() {
        let engine = HeuristicEngine::new(3.8, 500);
        let features = DomainFeatures::extract("google.com");
        assert_eq!(engine.evaluate(&features), HeuristicOutcome::Inconclusive);
    }

    #[test]
    fn test_threshold_adapts_to_percentile() {
        let engine = HeuristicEngine::new(3.8, 10);
        for _ in 0..10 {
            engine.observe(3.2);
        }
        assert!((engine.entropy_threshold() - 3.2).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_clamped_low() {
        let engine = HeuristicEngine::new(3.8, 10);
        for _ in 0..10 {
            engine.observe(0.5);
        }
        assert_eq!(engine.entropy_threshold(), 3.0);
    }

    #[test]
    fn test_threshold_clamped_high() {
        let engine = HeuristicEngine::new(3.8, 10);
        for _ in 0..10 {
            engine.observe(7.9);
        }
        assert_eq!(engine.entropy_threshold(), 4.5);
    }

    #[test]
    fn test_threshold_survives_adversarial_inputs() {
        let engine = HeuristicEngine::new(3.8, 5);
        for value in [f64::MAX, -1.0, 0.0, 1e300, f64::MIN_POSITIVE] {
            engine.observe(value);
        }
        let threshold = engine.entropy_threshold();
        assert!((THRESHOLD_CLAMP.0..=THRESHOLD_CLAMP.1).contains(&threshold));
    }
}
