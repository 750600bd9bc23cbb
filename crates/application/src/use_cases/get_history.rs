use crate::services::VerdictBuffer;
use std::sync::Arc;
use warden_dns_domain::Verdict;

/// Most recently committed verdicts, newest first, clamped to the buffer
/// capacity.
pub struct GetHistoryUseCase {
    buffer: Arc<VerdictBuffer>,
}

impl GetHistoryUseCase {
    pub fn new(buffer: Arc<VerdictBuffer>) -> Self {
        Self { buffer }
    }

    pub fn execute(&self, limit: Option<usize>) -> Vec<Arc<Verdict>> {
        let limit = limit
            .unwrap_or(self.buffer.capacity())
            .min(self.buffer.capacity());
        self.buffer.recent(limit)
    }
}

/// Verdicts whose path included a manual request in the current session.
pub struct GetManualHistoryUseCase {
    buffer: Arc<VerdictBuffer>,
}

impl GetManualHistoryUseCase {
    pub fn new(buffer: Arc<VerdictBuffer>) -> Self {
        Self { buffer }
    }

    pub fn execute(&self, limit: Option<usize>) -> Vec<Arc<Verdict>> {
        let limit = limit
            .unwrap_or(self.buffer.capacity())
            .min(self.buffer.capacity());
        self.buffer.manual_recent(limit)
    }
}
