use async_trait::async_trait;
use warden_dns_domain::{DomainError, Verdict};

/// Durable second tier of the verdict cache. Implementations enforce
/// their own TTL at read time and compact on startup; `load` never
/// returns an expired entry.
#[async_trait]
pub trait DiskCachePort: Send + Sync {
    async fn load(&self, domain: &str) -> Result<Option<Verdict>, DomainError>;
    async fn store(&self, verdict: &Verdict) -> Result<(), DomainError>;
    async fn compact(&self) -> Result<(), DomainError>;
}
