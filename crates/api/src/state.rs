use std::sync::Arc;
use warden_dns_application::services::VerdictBuffer;
use warden_dns_application::use_cases::{
    AnalyzeDomainUseCase, GetHistoryUseCase, GetManualHistoryUseCase, GetSystemStatsUseCase,
};

#[derive(Clone)]
pub struct AppState {
    pub analyze: Arc<AnalyzeDomainUseCase>,
    pub history: Arc<GetHistoryUseCase>,
    pub manual_history: Arc<GetManualHistoryUseCase>,
    pub stats: Arc<GetSystemStatsUseCase>,
    pub buffer: Arc<VerdictBuffer>,
}
