pub mod analyze_domain;
pub mod get_history;
pub mod get_system_stats;
pub mod poll_upstream;

pub use analyze_domain::AnalyzeDomainUseCase;
pub use get_history::{GetHistoryUseCase, GetManualHistoryUseCase};
pub use get_system_stats::GetSystemStatsUseCase;
pub use poll_upstream::{PollUpstreamUseCase, TickSummary};
