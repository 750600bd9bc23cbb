use dashmap::DashSet;
use rustc_hash::{FxBuildHasher, FxHashSet};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

struct Window {
    order: VecDeque<Arc<str>>,
    members: FxHashSet<Arc<str>>,
}

/// Keeps a domain from being analyzed twice: an in-flight set for work in
/// progress, and a FIFO window of recently decided domains. The two are
/// disjoint; a domain moves from in-flight to the window at commit time.
pub struct Deduplicator {
    in_flight: DashSet<Arc<str>, FxBuildHasher>,
    window: Mutex<Window>,
    capacity: usize,
}

impl Deduplicator {
    pub fn new(capacity: usize) -> Self {
        Self {
            in_flight: DashSet::with_hasher(FxBuildHasher),
            window: Mutex::new(Window {
                order: VecDeque::with_capacity(capacity.min(1024)),
                members: FxHashSet::default(),
            }),
            capacity: capacity.max(1),
        }
    }

    /// Polled-path admission: rejected while the domain is in flight or
    /// recently decided. Admission claims the in-flight slot. Callers
    /// additionally drop domains with a live cache entry.
    pub fn admit(&self, domain: &Arc<str>) -> bool {
        if self.window.lock().unwrap().members.contains(domain) {
            return false;
        }
        self.in_flight.insert(Arc::clone(domain))
    }

    /// Manual-path entry: always claims the slot, evicting the domain
    /// from the recent window so the disjointness invariant holds.
    pub fn begin(&self, domain: &Arc<str>) {
        let mut window = self.window.lock().unwrap();
        if window.members.remove(domain) {
            window.order.retain(|d| d != domain);
        }
        drop(window);
        self.in_flight.insert(Arc::clone(domain));
    }

    /// Commit: releases the in-flight slot and records the domain as
    /// recently decided, FIFO-evicting beyond capacity.
    pub fn finish(&self, domain: &Arc<str>) {
        self.in_flight.remove(domain);

        let mut window = self.window.lock().unwrap();
        if window.members.insert(Arc::clone(domain)) {
            window.order.push_back(Arc::clone(domain));
            while window.order.len() > self.capacity {
                if let Some(evicted) = window.order.pop_front() {
                    window.members.remove(&evicted);
                }
            }
        }
    }

    /// Admission rollback when the admitted domain could not be enqueued.
    /// The domain stays eligible for a later tick.
    pub fn abort(&self, domain: &Arc<str>) {
        self.in_flight.remove(domain);
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn window_len(&self) -> usize {
        self.window.lock().unwrap().order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc(s: &str) -> Arc<str> {
        Arc::from(s)
    }

    #[test]
    fn test_admit_claims_in_flight() {
        let dedup = Deduplicator::new(10);
        let d = arc("example.com");
        assert!(dedup.admit(&d));
        assert!(!dedup.admit(&d));
        assert_eq!(dedup.in_flight_len(), 1);
    }

    #[test]
    fn test_finish_moves_to_window() {
        let dedup = Deduplicator::new(10);
        let d = arc("example.com");
        assert!(dedup.admit(&d));
        dedup.finish(&d);

        assert_eq!(dedup.in_flight_len(), 0);
        assert_eq!(dedup.window_len(), 1);
        // Recently decided: not re-admitted.
        assert!(!dedup.admit(&d));
    }

    #[test]
    fn test_fifo_eviction_restores_admission() {
        let dedup = Deduplicator::new(2);
        for name in ["a.com", "b.com", "c.com"] {
            let d = arc(name);
            assert!(dedup.admit(&d));
            dedup.finish(&d);
        }

        assert_eq!(dedup.window_len(), 2);
        // a.com was evicted FIFO and is admissible again.
        assert!(dedup.admit(&arc("a.com")));
        assert!(!dedup.admit(&arc("c.com")));
    }

    #[test]
    fn test_manual_begin_removes_from_window() {
        let dedup = Deduplicator::new(10);
        let d = arc("example.com");
        dedup.admit(&d);
        dedup.finish(&d);

        dedup.begin(&d);
        assert_eq!(dedup.in_flight_len(), 1);
        assert_eq!(dedup.window_len(), 0);
    }

    #[test]
    fn test_abort_releases_slot() {
        let dedup = Deduplicator::new(10);
        let d = arc("example.com");
        assert!(dedup.admit(&d));
        dedup.abort(&d);
        assert!(dedup.admit(&d));
        assert_eq!(dedup.window_len(), 0);
    }
}
