//! Warden DNS Domain Layer
pub mod config;
pub mod errors;
pub mod features;
pub mod fingerprint;
pub mod signature;
pub mod stats;
pub mod upstream_event;
pub mod verdict;

pub use config::Config;
pub use errors::DomainError;
pub use features::{shannon_entropy, DomainFeatures};
pub use fingerprint::DomainFingerprint;
pub use signature::{baseline_signatures, rule_prefix, Signature, SignatureKey};
pub use stats::{AnomalyEngineStats, CacheStats, SystemStats, ThresholdStats};
pub use upstream_event::{ClientClass, FilterReason, UpstreamEvent, UpstreamMeta};
pub use verdict::{RiskLevel, ThreatCategory, Verdict, VerdictSource};
