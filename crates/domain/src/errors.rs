use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Malformed upstream payload: {0}")]
    MalformedUpstreamPayload(String),

    #[error("Reasoning service unavailable: {0}")]
    ReasoningUnavailable(String),

    #[error("Reasoning response violated schema: {0}")]
    ReasoningSchemaViolation(String),

    #[error("Reasoning circuit is open")]
    CircuitOpen,

    #[error("Ledger append failed: {0}")]
    LedgerAppendFailed(String),

    #[error("Snapshot store error: {0}")]
    SnapshotStore(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Analysis deadline exceeded")]
    DeadlineExceeded,

    #[error("Worker pool saturated")]
    PoolSaturated,

    #[error("Subsystem disabled: {0}")]
    SubsystemDisabled(&'static str),

    #[error("Internal invariant violated: {0}")]
    InvariantViolated(String),
}
