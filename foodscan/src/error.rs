use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FoodScanError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM unavailable: {0}")]
    LlmUnavailable(String),

    #[error("LLM rate limit exceeded, retry after {retry_after:?} seconds")]
    LlmRateLimit { retry_after: Option<u64> },
}

impl FoodScanError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            FoodScanError::NotFound(_) => StatusCode::NOT_FOUND,
            FoodScanError::Validation(_) => StatusCode::BAD_REQUEST,
            FoodScanError::Json(_) => StatusCode::BAD_REQUEST,
            FoodScanError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FoodScanError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FoodScanError::Llm(_) => StatusCode::BAD_GATEWAY,
            FoodScanError::LlmUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            FoodScanError::LlmRateLimit { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// True for malformed or incomplete caller input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, FoodScanError::Validation(_) | FoodScanError::Json(_))
    }
}

impl IntoResponse for FoodScanError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            FoodScanError::NotFound(msg) => msg.clone(),
            FoodScanError::Validation(msg) => msg.clone(),
            FoodScanError::Llm(msg) => msg.clone(),
            FoodScanError::LlmUnavailable(msg) => msg.clone(),
            FoodScanError::Json(e) => e.to_string(),
            FoodScanError::LlmRateLimit { retry_after } => {
                format!("LLM rate limit exceeded, retry after {retry_after:?} seconds")
            }
            FoodScanError::Database(e) => {
                tracing::error!(error = %e, "Database error surfaced to client");
                "An internal error occurred".to_string()
            }
            FoodScanError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error surfaced to client");
                "An internal error occurred".to_string()
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, FoodScanError>;
