use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Host;

/// Maximum length of a full DNS name in its ASCII form (RFC 1035).
const MAX_NAME_LEN: usize = 253;

/// A normalized domain name: lowercase, ASCII-compatible encoding, no
/// trailing dot. This is the cache and dedup key for the whole pipeline;
/// anything that fails validation here never enters it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainFingerprint(Arc<str>);

impl DomainFingerprint {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim_end_matches('.');

        if trimmed.is_empty() {
            return Err(DomainError::InvalidDomainName("empty name".to_string()));
        }

        if trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(DomainError::InvalidDomainName(format!(
                "'{trimmed}' contains whitespace or control characters"
            )));
        }

        // IDN -> punycode and lowercasing both happen inside the host parser.
        let host = Host::parse(trimmed)
            .map_err(|e| DomainError::InvalidDomainName(format!("'{trimmed}': {e}")))?;

        let ascii = match host {
            Host::Domain(name) => name,
            Host::Ipv4(_) | Host::Ipv6(_) => {
                return Err(DomainError::InvalidDomainName(format!(
                    "'{trimmed}' is an IP literal, not a domain"
                )));
            }
        };

        if !ascii.contains('.') {
            return Err(DomainError::InvalidDomainName(format!(
                "'{ascii}' has no dot"
            )));
        }

        if ascii.len() > MAX_NAME_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "name is {} bytes, limit is {MAX_NAME_LEN}",
                ascii.len()
            )));
        }

        Ok(Self(Arc::from(ascii.as_str())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Right-most label of the name.
    pub fn tld(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or("")
    }

    pub fn as_arc(&self) -> Arc<str> {
        Arc::clone(&self.0)
    }
}

impl std::fmt::Display for DomainFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DomainFingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
