pub mod disk_cache;
pub mod ledger;
pub mod reasoning;
pub mod signature_snapshot;
pub mod upstream_log;

pub use disk_cache::DiskCachePort;
pub use ledger::{LedgerPort, LedgerRow};
pub use reasoning::{EscalationHint, ReasoningAssessment, ReasoningPort, ReasoningRequest};
pub use signature_snapshot::SignatureSnapshotPort;
pub use upstream_log::UpstreamLogPort;
