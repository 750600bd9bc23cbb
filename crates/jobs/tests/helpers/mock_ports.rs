#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use warden_dns_application::ports::{SignatureSnapshotPort, UpstreamLogPort};
use warden_dns_domain::{DomainError, FilterReason, Signature, UpstreamEvent};

pub struct MockSignatureSnapshotPort {
    persisted: Mutex<Vec<Vec<Signature>>>,
    call_count: AtomicU64,
}

impl MockSignatureSnapshotPort {
    pub fn new() -> Self {
        Self {
            persisted: Mutex::new(Vec::new()),
            call_count: AtomicU64::new(0),
        }
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_persisted(&self) -> Option<Vec<Signature>> {
        self.persisted.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl SignatureSnapshotPort for MockSignatureSnapshotPort {
    async fn load(&self) -> Result<Option<Vec<Signature>>, DomainError> {
        Ok(None)
    }

    async fn persist(&self, signatures: &[Signature]) -> Result<(), DomainError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.persisted.lock().unwrap().push(signatures.to_vec());
        Ok(())
    }
}

pub struct MockUpstreamLogPort {
    call_count: AtomicU64,
}

impl MockUpstreamLogPort {
    pub fn new() -> Self {
        Self {
            call_count: AtomicU64::new(0),
        }
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl UpstreamLogPort for MockUpstreamLogPort {
    async fn fetch_recent(&self, _limit: usize) -> Result<Vec<UpstreamEvent>, DomainError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Ok(vec![UpstreamEvent {
            domain: Arc::from("tick.example.com"),
            answered_at: chrono::Utc::now(),
            filter_reason: FilterReason::new("NotFilteredNotFound"),
            filter_rule: None,
            filter_id: None,
            client: None,
        }])
    }
}
