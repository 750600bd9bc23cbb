use serde::{Deserialize, Serialize};

/// Two-tier verdict cache: bounded LRU in memory, size-bounded snapshot
/// store on disk.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: usize,

    #[serde(default = "default_memory_ttl")]
    pub memory_ttl_secs: u64,

    #[serde(default = "default_disk_path")]
    pub disk_path: String,

    #[serde(default = "default_disk_ttl")]
    pub disk_ttl_secs: u64,

    #[serde(default = "default_disk_max_bytes")]
    pub disk_max_bytes: u64,

    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    #[serde(default = "default_write_queue")]
    pub write_queue: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory_capacity: default_memory_capacity(),
            memory_ttl_secs: default_memory_ttl(),
            disk_path: default_disk_path(),
            disk_ttl_secs: default_disk_ttl(),
            disk_max_bytes: default_disk_max_bytes(),
            sweep_interval_secs: default_sweep_interval(),
            write_queue: default_write_queue(),
        }
    }
}

fn default_memory_capacity() -> usize {
    5000
}

fn default_memory_ttl() -> u64 {
    300
}

fn default_disk_path() -> String {
    "warden-verdicts.cache".to_string()
}

fn default_disk_ttl() -> u64 {
    3600
}

fn default_disk_max_bytes() -> u64 {
    16 * 1024 * 1024
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_write_queue() -> usize {
    256
}
