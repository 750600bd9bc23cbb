use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use warden_dns_domain::DomainError;

pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Validation is the only failure class that surfaces to callers;
        // everything else in the pipeline degrades to a Fallback verdict
        // before it reaches a handler.
        let (status, message) = match &self.0 {
            DomainError::InvalidDomainName(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
