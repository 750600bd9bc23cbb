use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use warden_dns_application::ports::SignatureSnapshotPort;
use warden_dns_domain::{DomainError, Signature};

/// Leading magic + format version for the signature snapshot.
const HEADER: &[u8; 4] = b"WSS\x01";

/// Single-file signature snapshot, rewritten atomically: the new content
/// lands in a sibling temp file first and is renamed over the old one.
pub struct FileSignatureStore {
    path: PathBuf,
}

impl FileSignatureStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

#[async_trait]
impl SignatureSnapshotPort for FileSignatureStore {
    async fn load(&self) -> Result<Option<Vec<Signature>>, DomainError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DomainError::SnapshotStore(e.to_string())),
        };

        if bytes.len() < HEADER.len() || &bytes[..HEADER.len()] != HEADER {
            warn!(
                path = %self.path.display(),
                "Unknown signature snapshot format, ignoring"
            );
            return Ok(None);
        }

        let signatures: Vec<Signature> = serde_json::from_slice(&bytes[HEADER.len()..])
            .map_err(|e| DomainError::SnapshotStore(e.to_string()))?;
        info!(
            path = %self.path.display(),
            signatures = signatures.len(),
            "Signature snapshot loaded"
        );
        Ok(Some(signatures))
    }

    async fn persist(&self, signatures: &[Signature]) -> Result<(), DomainError> {
        let mut payload = HEADER.to_vec();
        let body = serde_json::to_vec(signatures)
            .map_err(|e| DomainError::SnapshotStore(e.to_string()))?;
        payload.extend_from_slice(&body);

        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, payload)
            .await
            .map_err(|e| DomainError::SnapshotStore(e.to_string()))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| DomainError::SnapshotStore(e.to_string()))?;
        Ok(())
    }
}
