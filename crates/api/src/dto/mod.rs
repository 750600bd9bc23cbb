pub mod verdict;

pub use verdict::{AnalyzeRequest, HistoryQuery, UpstreamMetaResponse, VerdictResponse};
