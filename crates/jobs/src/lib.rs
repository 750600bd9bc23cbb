pub mod cache_sweep;
pub mod poll_job;
pub mod runner;
pub mod signature_snapshot;

pub use cache_sweep::CacheSweepJob;
pub use poll_job::PollJob;
pub use runner::JobRunner;
pub use signature_snapshot::SignatureSnapshotJob;
