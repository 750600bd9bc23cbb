use async_trait::async_trait;
use warden_dns_domain::{DomainError, UpstreamEvent};

/// Read side of the sinkhole's query log. Implementations own endpoint
/// failover and authentication; an empty batch is a valid outcome.
#[async_trait]
pub trait UpstreamLogPort: Send + Sync {
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<UpstreamEvent>, DomainError>;
}
