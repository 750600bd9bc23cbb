use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use warden_dns_domain::Verdict;

/// Per-subscriber queue depth; a lagging subscriber loses its oldest
/// entries, the publisher never blocks.
const SUBSCRIBER_QUEUE: usize = 32;

/// Bounded in-memory window of committed verdicts plus the push fanout.
/// The ring preserves commit order; subscribers receive verdicts in the
/// same order, newest last. Manual-path commits are additionally kept in
/// a session-scoped list for `/manual-history`.
pub struct VerdictBuffer {
    ring: Mutex<VecDeque<Arc<Verdict>>>,
    manual: Mutex<VecDeque<Arc<Verdict>>>,
    capacity: usize,
    sender: broadcast::Sender<Arc<Verdict>>,
    subscriber_dropped: AtomicU64,
}

impl VerdictBuffer {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(SUBSCRIBER_QUEUE);
        Self {
            ring: Mutex::new(VecDeque::with_capacity(capacity)),
            manual: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
            sender,
            subscriber_dropped: AtomicU64::new(0),
        }
    }

    pub fn push(&self, verdict: Arc<Verdict>, manual: bool) {
        {
            let mut ring = self.ring.lock().unwrap();
            if ring.len() == self.capacity {
                ring.pop_front();
            }
            ring.push_back(Arc::clone(&verdict));
        }

        if manual {
            let mut list = self.manual.lock().unwrap();
            if list.len() == self.capacity {
                list.pop_front();
            }
            list.push_back(Arc::clone(&verdict));
        }

        // No receivers is fine; push is fire-and-forget.
        let _ = self.sender.send(verdict);
    }

    /// Most recent first, at most `limit`.
    pub fn recent(&self, limit: usize) -> Vec<Arc<Verdict>> {
        let ring = self.ring.lock().unwrap();
        ring.iter().rev().take(limit).cloned().collect()
    }

    pub fn manual_recent(&self, limit: usize) -> Vec<Arc<Verdict>> {
        let list = self.manual.lock().unwrap();
        list.iter().rev().take(limit).cloned().collect()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Verdict>> {
        self.sender.subscribe()
    }

    /// Called by stream handlers when a receiver reports lag.
    pub fn note_subscriber_drop(&self, lost: u64) {
        self.subscriber_dropped.fetch_add(lost, Ordering::Relaxed);
    }

    pub fn subscriber_dropped(&self) -> u64 {
        self.subscriber_dropped.load(Ordering::Relaxed)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.ring.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
