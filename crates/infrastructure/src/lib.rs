//! Warden DNS Infrastructure Layer
//!
//! Adapters behind the application ports: the sinkhole log client, the
//! reasoning client, the on-disk verdict cache, the signature snapshot
//! store, and the ledger sink.
pub mod cache;
pub mod ledger;
pub mod reasoning;
pub mod signatures;
pub mod upstream;

pub use cache::FileVerdictStore;
pub use ledger::HttpLedgerSink;
pub use reasoning::ReasoningClient;
pub use signatures::FileSignatureStore;
pub use upstream::SinkholeLogClient;
