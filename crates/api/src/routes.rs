use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Creates the verdict HTTP surface with state.
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/history", get(handlers::get_history))
        .route("/manual-history", get(handlers::get_manual_history))
        .route("/analyze", post(handlers::analyze))
        .route("/api/stats/system", get(handlers::get_system_stats))
        .route("/stream", get(handlers::stream_verdicts))
        .with_state(state)
}
