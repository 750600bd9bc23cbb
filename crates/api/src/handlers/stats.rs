use crate::state::AppState;
use axum::{extract::State, Json};
use tracing::instrument;
use warden_dns_domain::SystemStats;

#[instrument(skip(state), name = "api_get_system_stats")]
pub async fn get_system_stats(State(state): State<AppState>) -> Json<SystemStats> {
    Json(state.stats.execute())
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
