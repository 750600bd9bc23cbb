use async_trait::async_trait;
use warden_dns_domain::{DomainError, Signature};

/// Persistence for the learned signature set. `load` returns None when no
/// snapshot exists (callers seed the baseline); `persist` must be atomic
/// (write-then-rename).
#[async_trait]
pub trait SignatureSnapshotPort: Send + Sync {
    async fn load(&self) -> Result<Option<Vec<Signature>>, DomainError>;
    async fn persist(&self, signatures: &[Signature]) -> Result<(), DomainError>;
}
