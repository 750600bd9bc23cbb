use arc_swap::ArcSwap;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex};
use warden_dns_domain::{RiskLevel, Signature, SignatureKey, ThreatCategory};

/// Signatures unseen for this long stop matching. Baseline seeds carry
/// `hits == 0` and are exempt until first confirmed.
const STALE_AFTER_DAYS: i64 = 30;

type SignatureMap = FxHashMap<SignatureKey, Signature>;

/// Learned signature set. Readers grab an immutable snapshot per lookup;
/// the pattern learner is the single writer and swaps in a new map per
/// update (the map stays small, a clone per learn is cheap).
pub struct SignatureStore {
    snapshot: ArcSwap<SignatureMap>,
    write_lock: Mutex<()>,
}

impl SignatureStore {
    pub fn new(seed: Vec<Signature>) -> Self {
        let mut map = SignatureMap::default();
        for sig in seed {
            map.insert(sig.key.clone(), sig);
        }
        Self {
            snapshot: ArcSwap::from_pointee(map),
            write_lock: Mutex::new(()),
        }
    }

    fn is_stale(signature: &Signature, now: DateTime<Utc>) -> bool {
        signature.hits > 0
            && now.signed_duration_since(signature.last_seen)
                > ChronoDuration::days(STALE_AFTER_DAYS)
    }

    /// Probes the given keys in order and returns the highest-confidence
    /// non-stale match; ties break toward the most recently seen.
    pub fn best_match(&self, probes: &[SignatureKey], now: DateTime<Utc>) -> Option<Signature> {
        let map = self.snapshot.load();
        probes
            .iter()
            .filter_map(|key| map.get(key))
            .filter(|sig| !Self::is_stale(sig, now))
            .max_by(|a, b| {
                a.confidence
                    .partial_cmp(&b.confidence)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.last_seen.cmp(&b.last_seen))
            })
            .cloned()
    }

    /// Learner write path: blend into an existing signature or insert a
    /// new one. `conf <- 0.8*conf + 0.2*observed` on update.
    pub fn apply(
        &self,
        key: SignatureKey,
        category: ThreatCategory,
        risk: RiskLevel,
        observed_confidence: f64,
        seen_at: DateTime<Utc>,
    ) {
        let _guard = self.write_lock.lock().unwrap();
        let mut map: SignatureMap = (**self.snapshot.load()).clone();

        match map.get_mut(&key) {
            Some(existing) => {
                existing.hits += 1;
                existing.last_seen = seen_at;
                existing.confidence =
                    (0.8 * existing.confidence + 0.2 * observed_confidence).clamp(0.0, 1.0);
                existing.category = category;
                existing.risk = risk;
            }
            None => {
                map.insert(
                    key.clone(),
                    Signature::new(key, category, risk, observed_confidence, seen_at),
                );
            }
        }

        self.snapshot.store(Arc::new(map));
    }

    /// Replaces the whole set, e.g. from a disk snapshot at startup.
    pub fn replace(&self, signatures: Vec<Signature>) {
        let _guard = self.write_lock.lock().unwrap();
        let mut map = SignatureMap::default();
        for sig in signatures {
            map.insert(sig.key.clone(), sig);
        }
        self.snapshot.store(Arc::new(map));
    }

    pub fn export(&self) -> Vec<Signature> {
        self.snapshot.load().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
