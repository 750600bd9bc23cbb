pub mod analysis;
pub mod cache;
pub mod errors;
pub mod ledger;
pub mod logging;
pub mod reasoning;
pub mod root;
pub mod server;
pub mod upstream;

pub use analysis::AnalysisConfig;
pub use cache::CacheConfig;
pub use errors::ConfigError;
pub use ledger::LedgerConfig;
pub use logging::LoggingConfig;
pub use reasoning::ReasoningConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use upstream::{UpstreamConfig, MIN_POLL_INTERVAL_SECS};
