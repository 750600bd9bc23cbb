use serde::{Deserialize, Serialize};

/// Floor for the poll interval; ticks faster than this would hammer the
/// sinkhole for no benefit.
pub const MIN_POLL_INTERVAL_SECS: u64 = 5;

/// Sinkhole query-log endpoint and polling cadence. The URL list is
/// prioritized: primary first, then the host-gateway alternate, then
/// loopback; the poller remembers whichever answered last.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_urls")]
    pub urls: Vec<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_batch_limit")]
    pub batch_limit: usize,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_dedup_window")]
    pub dedup_window: usize,
}

impl UpstreamConfig {
    pub fn effective_poll_interval(&self) -> u64 {
        self.poll_interval_secs.max(MIN_POLL_INTERVAL_SECS)
    }

    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            urls: default_urls(),
            username: None,
            password: None,
            poll_interval_secs: default_poll_interval(),
            batch_limit: default_batch_limit(),
            request_timeout_secs: default_request_timeout(),
            dedup_window: default_dedup_window(),
        }
    }
}

fn default_urls() -> Vec<String> {
    vec![
        "http://adguard:3000".to_string(),
        "http://host.docker.internal:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

fn default_poll_interval() -> u64 {
    30
}

fn default_batch_limit() -> usize {
    100
}

fn default_request_timeout() -> u64 {
    10
}

fn default_dedup_window() -> usize {
    5000
}
