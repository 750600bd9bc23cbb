use serde::{Deserialize, Serialize};

use super::analysis::AnalysisConfig;
use super::cache::CacheConfig;
use super::errors::ConfigError;
use super::ledger::LedgerConfig;
use super::logging::LoggingConfig;
use super::reasoning::ReasoningConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub reasoning: ReasoningConfig,

    #[serde(default)]
    pub ledger: LedgerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("warden-dns.toml").exists() {
            Self::from_file("warden-dns.toml")?
        } else if std::path::Path::new("/etc/warden-dns/config.toml").exists() {
            Self::from_file("/etc/warden-dns/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.apply_env_overrides();
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.web_port {
            self.server.web_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(interval) = overrides.poll_interval {
            self.upstream.poll_interval_secs = interval;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Credentials come from the environment, never the config file on
    /// shared hosts. File values act as fallbacks for dev setups.
    fn apply_env_overrides(&mut self) {
        if let Ok(user) = std::env::var("WARDEN_UPSTREAM_USER") {
            self.upstream.username = Some(user);
        }
        if let Ok(pass) = std::env::var("WARDEN_UPSTREAM_PASS") {
            self.upstream.password = Some(pass);
        }
        if let Ok(key) = std::env::var("WARDEN_REASONING_API_KEY") {
            self.reasoning.api_key = Some(key);
        }
        if let Ok(token) = std::env::var("WARDEN_LEDGER_TOKEN") {
            self.ledger.token = Some(token);
        }
        if let Ok(id) = std::env::var("WARDEN_LEDGER_ID") {
            self.ledger.ledger_id = Some(id);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.web_port == 0 {
            return Err(ConfigError::Validation("Web port cannot be 0".to_string()));
        }

        if self.upstream.urls.is_empty() {
            return Err(ConfigError::Validation(
                "No upstream log URLs configured".to_string(),
            ));
        }

        if self.analysis.worker_pool_size == 0 {
            return Err(ConfigError::Validation(
                "Worker pool size cannot be 0".to_string(),
            ));
        }

        if self.analysis.buffer_capacity == 0 {
            return Err(ConfigError::Validation(
                "Verdict buffer capacity cannot be 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.analysis.metadata_threshold) {
            return Err(ConfigError::Validation(format!(
                "metadata_threshold {} outside [0, 1]",
                self.analysis.metadata_threshold
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub web_port: Option<u16>,
    pub bind_address: Option<String>,
    pub poll_interval: Option<u64>,
    pub log_level: Option<String>,
}
