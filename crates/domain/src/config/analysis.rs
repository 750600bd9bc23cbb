use serde::{Deserialize, Serialize};

/// Tuning for the tiered analysis pipeline and its worker pool.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_worker_pool_size")]
    pub worker_pool_size: usize,

    /// Global per-domain budget. The reasoning tier may extend up to its
    /// own timeout when budget remains.
    #[serde(default = "default_domain_budget_ms")]
    pub domain_budget_ms: u64,

    #[serde(default = "default_metadata_threshold")]
    pub metadata_threshold: f64,

    /// Initial entropy threshold; drifts to the observed 90th percentile.
    #[serde(default = "default_entropy_threshold")]
    pub entropy_threshold: f64,

    #[serde(default = "default_entropy_window")]
    pub entropy_window: usize,

    #[serde(default = "default_anomaly_min_samples")]
    pub anomaly_min_samples: usize,

    #[serde(default = "default_anomaly_threshold")]
    pub anomaly_threshold: f64,

    #[serde(default = "default_anomaly_buffer")]
    pub anomaly_buffer: usize,

    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,

    #[serde(default = "default_signature_snapshot_path")]
    pub signature_snapshot_path: String,

    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            worker_pool_size: default_worker_pool_size(),
            domain_budget_ms: default_domain_budget_ms(),
            metadata_threshold: default_metadata_threshold(),
            entropy_threshold: default_entropy_threshold(),
            entropy_window: default_entropy_window(),
            anomaly_min_samples: default_anomaly_min_samples(),
            anomaly_threshold: default_anomaly_threshold(),
            anomaly_buffer: default_anomaly_buffer(),
            buffer_capacity: default_buffer_capacity(),
            signature_snapshot_path: default_signature_snapshot_path(),
            snapshot_interval_secs: default_snapshot_interval(),
        }
    }
}

fn default_worker_pool_size() -> usize {
    8
}

fn default_domain_budget_ms() -> u64 {
    5000
}

fn default_metadata_threshold() -> f64 {
    0.75
}

fn default_entropy_threshold() -> f64 {
    3.8
}

fn default_entropy_window() -> usize {
    500
}

fn default_anomaly_min_samples() -> usize {
    10
}

fn default_anomaly_threshold() -> f64 {
    -0.1
}

fn default_anomaly_buffer() -> usize {
    10_000
}

fn default_buffer_capacity() -> usize {
    200
}

fn default_signature_snapshot_path() -> String {
    "warden-signatures.snap".to_string()
}

fn default_snapshot_interval() -> u64 {
    60
}
