use serde::{Deserialize, Serialize};

/// Remote reasoning service plus the circuit breaker guarding it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReasoningConfig {
    #[serde(default = "default_url")]
    pub url: String,

    /// Absent key disables the tier; the pipeline runs degraded.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_window")]
    pub window: usize,

    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: usize,

    #[serde(default = "default_open_base")]
    pub open_base_secs: u64,

    #[serde(default = "default_open_cap")]
    pub open_cap_secs: u64,
}

impl ReasoningConfig {
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: None,
            timeout_secs: default_timeout(),
            window: default_window(),
            failure_threshold: default_failure_threshold(),
            open_base_secs: default_open_base(),
            open_cap_secs: default_open_cap(),
        }
    }
}

fn default_url() -> String {
    "https://reasoning.warden-dns.dev/v1/analyze".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_window() -> usize {
    20
}

fn default_failure_threshold() -> usize {
    5
}

fn default_open_base() -> u64 {
    30
}

fn default_open_cap() -> u64 {
    300
}
