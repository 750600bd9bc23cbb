use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{oneshot, Notify};
use warden_dns_domain::{DomainFingerprint, UpstreamMeta, Verdict};

/// Drain at most this many manual jobs for every polled job when both
/// queues are non-empty.
const MANUAL_FAIRNESS: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOrigin {
    Polled,
    Manual,
}

pub struct AnalysisJob {
    pub fingerprint: DomainFingerprint,
    pub meta: Option<UpstreamMeta>,
    pub origin: RequestOrigin,
    pub note: Option<String>,
    /// Manual requests wait on the other end of this channel.
    pub reply: Option<oneshot::Sender<Arc<Verdict>>>,
}

struct Queues {
    manual: VecDeque<AnalysisJob>,
    polled: VecDeque<AnalysisJob>,
    manual_streak: u8,
}

/// Two-queue scheduler feeding the worker pool. Manual requests drain
/// first, bounded by a fairness ratio so a burst of ad-hoc analysis
/// cannot starve the polled stream.
pub struct AnalysisScheduler {
    queues: Mutex<Queues>,
    notify: Notify,
    capacity: usize,
}

impl AnalysisScheduler {
    pub fn new(capacity: usize) -> Self {
        Self {
            queues: Mutex::new(Queues {
                manual: VecDeque::new(),
                polled: VecDeque::new(),
                manual_streak: 0,
            }),
            notify: Notify::new(),
            capacity: capacity.max(1),
        }
    }

    /// False when the queue is full; the caller drops the event and
    /// counts it, a later tick will see the domain again.
    pub fn enqueue_polled(&self, job: AnalysisJob) -> bool {
        {
            let mut queues = self.queues.lock().unwrap();
            if queues.polled.len() >= self.capacity {
                return false;
            }
            queues.polled.push_back(job);
        }
        self.notify.notify_one();
        true
    }

    pub fn enqueue_manual(&self, job: AnalysisJob) -> bool {
        {
            let mut queues = self.queues.lock().unwrap();
            if queues.manual.len() >= self.capacity {
                return false;
            }
            queues.manual.push_back(job);
        }
        self.notify.notify_one();
        true
    }

    fn try_next(&self) -> Option<AnalysisJob> {
        let mut queues = self.queues.lock().unwrap();

        let take_manual = !queues.manual.is_empty()
            && (queues.polled.is_empty() || queues.manual_streak < MANUAL_FAIRNESS);

        if take_manual {
            queues.manual_streak += 1;
            return queues.manual.pop_front();
        }
        if let Some(job) = queues.polled.pop_front() {
            queues.manual_streak = 0;
            return Some(job);
        }
        queues.manual.pop_front()
    }

    pub async fn next(&self) -> AnalysisJob {
        loop {
            let notified = self.notify.notified();
            if let Some(job) = self.try_next() {
                // Wake a sibling in case more work is queued behind us.
                self.notify.notify_one();
                return job;
            }
            notified.await;
        }
    }

    pub fn queued(&self) -> usize {
        let queues = self.queues.lock().unwrap();
        queues.manual.len() + queues.polled.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(domain: &str, origin: RequestOrigin) -> AnalysisJob {
        AnalysisJob {
            fingerprint: DomainFingerprint::parse(domain).unwrap(),
            meta: None,
            origin,
            note: None,
            reply: None,
        }
    }

    #[test]
    fn test_manual_drains_first() {
        let scheduler = AnalysisScheduler::new(16);
        assert!(scheduler.enqueue_polled(job("polled.com", RequestOrigin::Polled)));
        assert!(scheduler.enqueue_manual(job("manual.com", RequestOrigin::Manual)));

        let first = scheduler.try_next().unwrap();
        assert_eq!(first.origin, RequestOrigin::Manual);
    }

    #[test]
    fn test_fairness_ratio_four_to_one() {
        let scheduler = AnalysisScheduler::new(32);
        for i in 0..8 {
            scheduler.enqueue_manual(job(&format!("m{i}.com"), RequestOrigin::Manual));
        }
        for i in 0..4 {
            scheduler.enqueue_polled(job(&format!("p{i}.com"), RequestOrigin::Polled));
        }

        let origins: Vec<RequestOrigin> = (0..6).map(|_| scheduler.try_next().unwrap().origin).collect();
        assert_eq!(
            origins,
            [
                RequestOrigin::Manual,
                RequestOrigin::Manual,
                RequestOrigin::Manual,
                RequestOrigin::Manual,
                RequestOrigin::Polled,
                RequestOrigin::Manual,
            ]
        );
    }

    #[test]
    fn test_bounded_queues() {
        let scheduler = AnalysisScheduler::new(2);
        assert!(scheduler.enqueue_polled(job("a.com", RequestOrigin::Polled)));
        assert!(scheduler.enqueue_polled(job("b.com", RequestOrigin::Polled)));
        assert!(!scheduler.enqueue_polled(job("c.com", RequestOrigin::Polled)));
        // Manual queue has its own bound.
        assert!(scheduler.enqueue_manual(job("d.com", RequestOrigin::Manual)));
    }

    #[tokio::test]
    async fn test_next_wakes_on_enqueue() {
        let scheduler = Arc::new(AnalysisScheduler::new(4));
        let waiter = Arc::clone(&scheduler);
        let handle = tokio::spawn(async move { waiter.next().await });

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        scheduler.enqueue_manual(job("late.com", RequestOrigin::Manual));

        let got = handle.await.unwrap();
        assert_eq!(got.fingerprint.as_str(), "late.com");
    }
}
