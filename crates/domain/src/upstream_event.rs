use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::sync::Arc;

/// The sinkhole's filter verdict for one query. The raw value is an opaque
/// upstream string; anything we do not recognize counts as unfiltered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterReason(Arc<str>);

impl FilterReason {
    pub fn new(raw: &str) -> Self {
        Self(Arc::from(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Known filtered markers from AdGuard-style sinkholes. Unknown values
    /// are treated as unfiltered.
    pub fn is_filtered(&self) -> bool {
        self.0.starts_with("Filtered") || self.0.contains("Blocked")
    }
}

impl std::fmt::Display for FilterReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coarse partition of the reporting client, used as one axis of a
/// signature key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ClientClass {
    Local,
    Remote,
    #[default]
    Unknown,
}

impl ClientClass {
    pub fn classify(client: Option<&str>) -> Self {
        let Some(client) = client else {
            return ClientClass::Unknown;
        };

        if let Ok(ip) = client.parse::<IpAddr>() {
            let local = match ip {
                IpAddr::V4(v4) => v4.is_private() || v4.is_loopback() || v4.is_link_local(),
                IpAddr::V6(v6) => v6.is_loopback() || (v6.segments()[0] & 0xfe00) == 0xfc00,
            };
            return if local {
                ClientClass::Local
            } else {
                ClientClass::Remote
            };
        }

        if client.ends_with(".local") || client.ends_with(".lan") || !client.contains('.') {
            ClientClass::Local
        } else {
            ClientClass::Remote
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientClass::Local => "local",
            ClientClass::Remote => "remote",
            ClientClass::Unknown => "unknown",
        }
    }
}

/// One entry from the sinkhole query log, as handed to the pipeline.
#[derive(Debug, Clone)]
pub struct UpstreamEvent {
    pub domain: Arc<str>,
    pub answered_at: DateTime<Utc>,
    pub filter_reason: FilterReason,
    pub filter_rule: Option<Arc<str>>,
    pub filter_id: Option<i64>,
    pub client: Option<Arc<str>>,
}

impl UpstreamEvent {
    pub fn client_class(&self) -> ClientClass {
        ClientClass::classify(self.client.as_deref())
    }
}

/// The upstream metadata carried on a committed verdict. Same fields as the
/// event minus the domain and timestamp, which live on the verdict itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamMeta {
    pub reason: FilterReason,
    pub rule: Option<Arc<str>>,
    pub filter_id: Option<i64>,
    pub client: Option<Arc<str>>,
}

impl From<&UpstreamEvent> for UpstreamMeta {
    fn from(event: &UpstreamEvent) -> Self {
        Self {
            reason: event.filter_reason.clone(),
            rule: event.filter_rule.clone(),
            filter_id: event.filter_id,
            client: event.client.clone(),
        }
    }
}

impl UpstreamMeta {
    pub fn client_class(&self) -> ClientClass {
        ClientClass::classify(self.client.as_deref())
    }
}
