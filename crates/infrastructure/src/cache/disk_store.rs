use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{info, warn};
use warden_dns_application::ports::DiskCachePort;
use warden_dns_domain::{DomainError, Verdict};

/// Leading magic + format version. A file with anything else is
/// discarded with a warning and the store starts empty.
const HEADER: &[u8; 4] = b"WVC\x01";

/// One appended record: the verdict plus its insertion time, which drives
/// the disk-tier TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredVerdict {
    inserted_at: DateTime<Utc>,
    verdict: Verdict,
}

struct Inner {
    index: HashMap<String, StoredVerdict>,
}

/// Append-and-compact verdict store keyed by domain. Appends are JSON
/// lines behind a versioned header; an in-memory index makes reads cheap
/// and compaction rewrites the live set atomically (write-then-rename).
pub struct FileVerdictStore {
    path: PathBuf,
    ttl: Duration,
    max_bytes: u64,
    inner: Mutex<Inner>,
}

impl FileVerdictStore {
    /// Opens (or creates) the store, validates the header, rebuilds the
    /// index, and compacts away dead entries from previous runs.
    pub async fn open(path: &Path, ttl: Duration, max_bytes: u64) -> Result<Self, DomainError> {
        let store = Self {
            path: path.to_path_buf(),
            ttl,
            max_bytes,
            inner: Mutex::new(Inner {
                index: HashMap::new(),
            }),
        };

        let entries = store.read_entries().await;
        {
            let mut inner = store.inner.lock().await;
            for entry in entries {
                inner.index.insert(entry.verdict.domain.to_string(), entry);
            }
            info!(
                path = %store.path.display(),
                entries = inner.index.len(),
                "Disk verdict cache loaded"
            );
        }
        store.compact().await?;
        Ok(store)
    }

    fn is_live(&self, entry: &StoredVerdict) -> bool {
        let age = Utc::now().signed_duration_since(entry.inserted_at);
        age.to_std().map_or(false, |age| age < self.ttl)
    }

    async fn read_entries(&self) -> Vec<StoredVerdict> {
        let Ok(bytes) = tokio::fs::read(&self.path).await else {
            return Vec::new();
        };

        if bytes.len() < HEADER.len() || &bytes[..HEADER.len()] != HEADER {
            warn!(path = %self.path.display(), "Unknown cache file format, starting empty");
            return Vec::new();
        }

        let body = String::from_utf8_lossy(&bytes[HEADER.len()..]);
        body.lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<StoredVerdict>(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    // A torn tail from a crashed append is expected; skip it.
                    warn!(error = %e, "Skipping unreadable cache line");
                    None
                }
            })
            .collect()
    }

    async fn rewrite(&self, entries: &[StoredVerdict]) -> Result<(), DomainError> {
        let tmp_path = self.path.with_extension("tmp");
        let mut payload = HEADER.to_vec();
        for entry in entries {
            let line =
                serde_json::to_string(entry).map_err(|e| DomainError::IoError(e.to_string()))?;
            payload.extend_from_slice(line.as_bytes());
            payload.push(b'\n');
        }

        tokio::fs::write(&tmp_path, payload)
            .await
            .map_err(|e| DomainError::IoError(e.to_string()))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| DomainError::IoError(e.to_string()))?;
        Ok(())
    }

    async fn file_len(&self) -> u64 {
        tokio::fs::metadata(&self.path)
            .await
            .map(|m| m.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl DiskCachePort for FileVerdictStore {
    async fn load(&self, domain: &str) -> Result<Option<Verdict>, DomainError> {
        let mut inner = self.inner.lock().await;
        match inner.index.get(domain) {
            Some(entry) if self.is_live(entry) => Ok(Some(entry.verdict.clone())),
            Some(_) => {
                // Lazy TTL filter at read time.
                inner.index.remove(domain);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn store(&self, verdict: &Verdict) -> Result<(), DomainError> {
        let entry = StoredVerdict {
            inserted_at: Utc::now(),
            verdict: verdict.clone(),
        };
        let line =
            serde_json::to_string(&entry).map_err(|e| DomainError::IoError(e.to_string()))?;

        {
            let mut inner = self.inner.lock().await;

            let fresh = !self.path.exists();
            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .await
                .map_err(|e| DomainError::IoError(e.to_string()))?;
            if fresh {
                file.write_all(HEADER)
                    .await
                    .map_err(|e| DomainError::IoError(e.to_string()))?;
            }
            file.write_all(format!("{line}\n").as_bytes())
                .await
                .map_err(|e| DomainError::IoError(e.to_string()))?;

            inner.index.insert(verdict.domain.to_string(), entry);
        }

        if self.file_len().await > self.max_bytes {
            self.compact().await?;
        }
        Ok(())
    }

    async fn compact(&self) -> Result<(), DomainError> {
        let live: Vec<StoredVerdict> = {
            let mut inner = self.inner.lock().await;
            inner.index.retain(|_, entry| {
                let age = Utc::now().signed_duration_since(entry.inserted_at);
                age.to_std().map_or(false, |age| age < self.ttl)
            });
            inner.index.values().cloned().collect()
        };

        self.rewrite(&live).await
    }
}
