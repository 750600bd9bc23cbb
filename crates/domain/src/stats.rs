use serde::Serialize;

/// Counters for both verdict cache tiers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub memory_entries: usize,
    pub memory_hits: u64,
    pub memory_misses: u64,
    pub memory_evictions: u64,
    pub disk_hits: u64,
    pub disk_misses: u64,
    pub disk_write_drops: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnomalyEngineStats {
    pub samples_seen: u64,
    pub buffer_len: usize,
    pub fits: u64,
    pub trained: bool,
}

/// Live adaptive thresholds, exposed for diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ThresholdStats {
    pub entropy_threshold: f64,
    pub anomaly_threshold: f64,
    pub metadata_threshold: f64,
}

/// Snapshot of the pipeline's decision counters. `autonomy_score` is the
/// derived local-to-total ratio, not a stored value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemStats {
    pub autonomy_score: f64,
    pub local_decisions: u64,
    pub cloud_decisions: u64,
    pub total_decisions: u64,
    pub learned_patterns: usize,
    pub breaker_state: String,
    pub poll_dropped: u64,
    pub subscriber_dropped: u64,
    pub cache_stats: CacheStats,
    pub anomaly_engine_stats: AnomalyEngineStats,
    pub thresholds: ThresholdStats,
}
