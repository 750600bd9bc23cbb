use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// TLDs with outsized abuse rates get extra weight in the feature vector.
const BAD_TLDS: &[&str] = &[
    "tk", "ml", "ga", "cf", "gq", "top", "xyz", "zip", "mov", "click", "ru", "su",
];

const BAD_TLD_WEIGHT: f64 = 1.5;
const DEFAULT_TLD_WEIGHT: f64 = 1.0;

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

/// Shannon entropy (base 2) over the character frequency distribution.
pub fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut char_counts: HashMap<char, u32> = HashMap::new();
    for c in s.chars() {
        *char_counts.entry(c).or_insert(0) += 1;
    }

    let len = s.chars().count() as f64;
    let mut entropy = 0.0;
    for count in char_counts.values() {
        let p = f64::from(*count) / len;
        entropy -= p * p.log2();
    }

    entropy
}

/// The part of the name left of the public suffix. Statistical signals on
/// the suffix itself are noise ("com" would dilute every ratio).
fn registrable(domain: &str) -> &str {
    match domain.rfind('.') {
        Some(idx) if idx > 0 => &domain[..idx],
        _ => domain,
    }
}

/// Fast statistical features of a bare domain name. Pure computation, no
/// I/O; the anomaly engine consumes the vector form. Entropy and the
/// character ratios are computed on the registrable portion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainFeatures {
    pub length: usize,
    pub entropy: f64,
    pub digit_ratio: f64,
    pub vowel_ratio: f64,
    pub tld_weight: f64,
}

impl DomainFeatures {
    pub fn extract(domain: &str) -> Self {
        let length = domain.chars().count();

        let name = registrable(domain);
        let name_len = name.chars().count().max(1) as f64;

        let digits = name.chars().filter(char::is_ascii_digit).count();
        let vowels = name
            .chars()
            .filter(|c| VOWELS.contains(&c.to_ascii_lowercase()))
            .count();

        let tld = domain.rsplit('.').next().unwrap_or("");
        let tld_weight = if BAD_TLDS.contains(&tld) {
            BAD_TLD_WEIGHT
        } else {
            DEFAULT_TLD_WEIGHT
        };

        Self {
            length,
            entropy: shannon_entropy(name),
            digit_ratio: digits as f64 / name_len,
            vowel_ratio: vowels as f64 / name_len,
            tld_weight,
        }
    }

    /// Feature vector in the fixed order the anomaly model was fit with.
    pub fn vector(&self) -> [f64; 5] {
        [
            self.length as f64,
            self.entropy,
            self.digit_ratio,
            self.vowel_ratio,
            self.tld_weight,
        ]
    }
}
