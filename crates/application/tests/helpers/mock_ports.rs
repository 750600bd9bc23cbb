#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use warden_dns_application::ports::{
    LedgerPort, LedgerRow, ReasoningAssessment, ReasoningPort, ReasoningRequest, UpstreamLogPort,
};
use warden_dns_domain::{DomainError, UpstreamEvent};

pub struct MockReasoningPort {
    response: Mutex<ReasoningAssessment>,
    should_fail: Mutex<bool>,
    call_count: AtomicU64,
    last_request: Mutex<Option<ReasoningRequest>>,
}

impl MockReasoningPort {
    pub fn new() -> Self {
        Self {
            response: Mutex::new(ReasoningAssessment {
                risk_score: 2,
                category: "Unknown".to_string(),
                explanation: "benign infrastructure".to_string(),
                recommended_action: "allow".to_string(),
            }),
            should_fail: Mutex::new(false),
            call_count: AtomicU64::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn respond_with(&self, risk_score: u8, category: &str, explanation: &str) {
        *self.response.lock().unwrap() = ReasoningAssessment {
            risk_score,
            category: category.to_string(),
            explanation: explanation.to_string(),
            recommended_action: "review".to_string(),
        };
    }

    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock().unwrap() = fail;
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<ReasoningRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReasoningPort for MockReasoningPort {
    async fn assess(&self, request: &ReasoningRequest) -> Result<ReasoningAssessment, DomainError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());
        if *self.should_fail.lock().unwrap() {
            return Err(DomainError::ReasoningUnavailable("mock failure".to_string()));
        }
        Ok(self.response.lock().unwrap().clone())
    }
}

pub struct MockLedgerPort {
    rows: Mutex<Vec<LedgerRow>>,
    fail_next: AtomicU64,
    call_count: AtomicU64,
}

impl MockLedgerPort {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail_next: AtomicU64::new(0),
            call_count: AtomicU64::new(0),
        }
    }

    /// The next `n` appends fail, after which appends succeed again.
    pub fn fail_next(&self, n: u64) {
        self.fail_next.store(n, Ordering::Relaxed);
    }

    pub fn rows(&self) -> Vec<LedgerRow> {
        self.rows.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl LedgerPort for MockLedgerPort {
    async fn append(&self, row: &LedgerRow) -> Result<(), DomainError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let remaining = self.fail_next.load(Ordering::Relaxed);
        if remaining > 0 {
            self.fail_next.store(remaining - 1, Ordering::Relaxed);
            return Err(DomainError::LedgerAppendFailed("mock outage".to_string()));
        }
        self.rows.lock().unwrap().push(row.clone());
        Ok(())
    }
}

pub struct MockUpstreamLogPort {
    batches: Mutex<Vec<Vec<UpstreamEvent>>>,
    should_fail: Mutex<bool>,
    call_count: AtomicU64,
}

impl MockUpstreamLogPort {
    pub fn new() -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
            should_fail: Mutex::new(false),
            call_count: AtomicU64::new(0),
        }
    }

    pub fn push_batch(&self, events: Vec<UpstreamEvent>) {
        self.batches.lock().unwrap().push(events);
    }

    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock().unwrap() = fail;
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl UpstreamLogPort for MockUpstreamLogPort {
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<UpstreamEvent>, DomainError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if *self.should_fail.lock().unwrap() {
            return Err(DomainError::UpstreamUnavailable("mock outage".to_string()));
        }
        let mut batches = self.batches.lock().unwrap();
        if batches.is_empty() {
            return Ok(Vec::new());
        }
        let mut batch = batches.remove(0);
        batch.truncate(limit);
        Ok(batch)
    }
}

/// Convenience builder for upstream events in tests.
pub fn upstream_event(domain: &str, reason: &str, secs_ago: i64) -> UpstreamEvent {
    upstream_event_at(
        domain,
        reason,
        chrono::Utc::now() - chrono::Duration::seconds(secs_ago),
    )
}

pub fn upstream_event_at(
    domain: &str,
    reason: &str,
    answered_at: chrono::DateTime<chrono::Utc>,
) -> UpstreamEvent {
    UpstreamEvent {
        domain: Arc::from(domain),
        answered_at,
        filter_reason: warden_dns_domain::FilterReason::new(reason),
        filter_rule: None,
        filter_id: None,
        client: Some(Arc::from("192.168.1.10")),
    }
}
