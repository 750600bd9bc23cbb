use crate::dto::{HistoryQuery, VerdictResponse};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use tracing::instrument;

#[instrument(skip(state), name = "api_get_history")]
pub async fn get_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Json<Vec<VerdictResponse>> {
    let verdicts = state.history.execute(params.limit);
    Json(verdicts.iter().map(|v| VerdictResponse::from(&**v)).collect())
}

#[instrument(skip(state), name = "api_get_manual_history")]
pub async fn get_manual_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Json<Vec<VerdictResponse>> {
    let verdicts = state.manual_history.execute(params.limit);
    Json(verdicts.iter().map(|v| VerdictResponse::from(&**v)).collect())
}
