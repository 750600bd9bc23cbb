use crate::ports::DiskCachePort;
use lru::LruCache;
use rustc_hash::FxBuildHasher;
use std::hash::{BuildHasher, Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use warden_dns_domain::{CacheStats, Verdict, VerdictSource};

const STRIPES: usize = 16;

struct MemoryEntry {
    verdict: Verdict,
    inserted_at: Instant,
}

type Stripe = Mutex<LruCache<Arc<str>, MemoryEntry, FxBuildHasher>>;

#[derive(Default)]
struct Counters {
    memory_hits: AtomicU64,
    memory_misses: AtomicU64,
    memory_evictions: AtomicU64,
    disk_hits: AtomicU64,
    disk_misses: AtomicU64,
    disk_write_drops: AtomicU64,
}

/// Two-tier verdict cache. Memory is a TTL'd LRU split across a striped
/// lock table (single writer per key, readers take the same stripe
/// briefly); disk is a durable second tier behind [`DiskCachePort`],
/// written asynchronously through a bounded queue.
pub struct VerdictCache {
    stripes: Vec<Stripe>,
    hasher: FxBuildHasher,
    ttl: Duration,
    disk: Option<Arc<dyn DiskCachePort>>,
    disk_tx: Option<mpsc::Sender<Verdict>>,
    counters: Counters,
}

impl VerdictCache {
    /// Memory-only cache; the disk tier is absent (tests, degraded boot).
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let per_stripe = (capacity / STRIPES).max(1);
        let stripes = (0..STRIPES)
            .map(|_| {
                Mutex::new(LruCache::with_hasher(
                    NonZeroUsize::new(per_stripe).unwrap(),
                    FxBuildHasher,
                ))
            })
            .collect();

        Self {
            stripes,
            hasher: FxBuildHasher,
            ttl,
            disk: None,
            disk_tx: None,
            counters: Counters::default(),
        }
    }

    /// Attaches the disk tier and spawns its write-behind worker. Must be
    /// called from within a tokio runtime.
    pub fn with_disk(mut self, disk: Arc<dyn DiskCachePort>, queue: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<Verdict>(queue.max(1));
        let writer_disk = Arc::clone(&disk);
        tokio::spawn(async move {
            while let Some(verdict) = rx.recv().await {
                if let Err(e) = writer_disk.store(&verdict).await {
                    warn!(domain = %verdict.domain, error = %e, "Disk cache write failed");
                }
            }
        });

        self.disk = Some(disk);
        self.disk_tx = Some(tx);
        self
    }

    fn stripe(&self, domain: &str) -> &Stripe {
        let mut hasher = self.hasher.build_hasher();
        domain.hash(&mut hasher);
        &self.stripes[(hasher.finish() as usize) % STRIPES]
    }

    fn memory_get(&self, domain: &str) -> Option<Verdict> {
        let mut stripe = self.stripe(domain).lock().unwrap();
        if let Some(entry) = stripe.get(domain) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.verdict.clone());
            }
            stripe.pop(domain);
        }
        None
    }

    fn memory_put(&self, verdict: Verdict) {
        let domain = Arc::clone(&verdict.domain);
        let mut stripe = self.stripe(&domain).lock().unwrap();
        let evicting = stripe.len() == stripe.cap().get() && !stripe.contains(&domain);
        if evicting {
            self.counters.memory_evictions.fetch_add(1, Ordering::Relaxed);
        }
        stripe.put(
            domain,
            MemoryEntry {
                verdict,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Read path: memory hit returns immediately; a disk hit repopulates
    /// memory; a miss on both is None.
    pub async fn lookup(&self, domain: &str) -> Option<Verdict> {
        if let Some(verdict) = self.memory_get(domain) {
            self.counters.memory_hits.fetch_add(1, Ordering::Relaxed);
            return Some(verdict);
        }
        self.counters.memory_misses.fetch_add(1, Ordering::Relaxed);

        let disk = self.disk.as_ref()?;
        match disk.load(domain).await {
            Ok(Some(verdict)) => {
                self.counters.disk_hits.fetch_add(1, Ordering::Relaxed);
                self.memory_put(verdict.clone());
                Some(verdict)
            }
            Ok(None) => {
                self.counters.disk_misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(e) => {
                warn!(domain, error = %e, "Disk cache read failed");
                None
            }
        }
    }

    /// Write path. Read-through stays monotonic: an existing live entry
    /// is only replaced by a Reasoning verdict, and never when the
    /// existing entry already came from Reasoning. Cache-hit re-emissions
    /// are never written back.
    pub fn store(&self, verdict: &Verdict) {
        if verdict.source == VerdictSource::Cache {
            return;
        }

        {
            let mut stripe = self.stripe(&verdict.domain).lock().unwrap();
            if let Some(existing) = stripe.peek(&*verdict.domain) {
                let live = existing.inserted_at.elapsed() < self.ttl;
                let replaceable = !live
                    || (verdict.source == VerdictSource::Reasoning
                        && existing.verdict.source != VerdictSource::Reasoning);
                if !replaceable {
                    debug!(domain = %verdict.domain, "Cache store skipped, fresher entry present");
                    return;
                }
            }
        }

        self.memory_put(verdict.clone());

        if let Some(tx) = &self.disk_tx {
            if tx.try_send(verdict.clone()).is_err() {
                self.counters.disk_write_drops.fetch_add(1, Ordering::Relaxed);
                warn!(domain = %verdict.domain, "Disk cache write queue full, dropping write");
            }
        }
    }

    /// Background sweep: drops expired memory entries. Disk entries are
    /// lazily filtered by the adapter at read time.
    pub fn purge_expired(&self) -> usize {
        let mut purged = 0;
        for stripe in &self.stripes {
            let mut stripe = stripe.lock().unwrap();
            let expired: Vec<Arc<str>> = stripe
                .iter()
                .filter(|(_, entry)| entry.inserted_at.elapsed() >= self.ttl)
                .map(|(domain, _)| Arc::clone(domain))
                .collect();
            for domain in expired {
                stripe.pop(&domain);
                purged += 1;
            }
        }
        purged
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            memory_entries: self.stripes.iter().map(|s| s.lock().unwrap().len()).sum(),
            memory_hits: self.counters.memory_hits.load(Ordering::Relaxed),
            memory_misses: self.counters.memory_misses.load(Ordering::Relaxed),
            memory_evictions: self.counters.memory_evictions.load(Ordering::Relaxed),
            disk_hits: self.counters.disk_hits.load(Ordering::Relaxed),
            disk_misses: self.counters.disk_misses.load(Ordering::Relaxed),
            disk_write_drops: self.counters.disk_write_drops.load(Ordering::Relaxed),
        }
    }
}
