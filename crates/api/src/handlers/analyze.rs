use crate::dto::{AnalyzeRequest, VerdictResponse};
use crate::errors::ApiError;
use crate::state::AppState;
use axum::{extract::State, Json};
use tracing::instrument;

/// Synchronous manual analysis. Invalid domains are a 400; any pipeline
/// degradation still answers 200 with a Fallback-source verdict.
#[instrument(skip(state, request), name = "api_analyze", fields(domain = %request.domain))]
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<VerdictResponse>, ApiError> {
    let verdict = state.analyze.execute(&request.domain, request.note).await?;
    Ok(Json(VerdictResponse::from(&*verdict)))
}
