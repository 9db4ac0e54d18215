// Error types for petcare-assist
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("AI provider error: {0}")]
    Provider(String),

    #[error("AI provider quota exceeded: {0}")]
    TooManyRequests(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("AI provider did not answer within {0} seconds")]
    Timeout(u64),

    /// Fixed user-facing places message; upstream detail is logged, not kept
    #[error("{0}")]
    Places(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AssistError {
    pub fn places(message: &str) -> Self {
        AssistError::Places(message.to_string())
    }

    /// Whether this error came from the AI provider call itself
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            AssistError::Provider(_)
                | AssistError::TooManyRequests(_)
                | AssistError::ServiceUnavailable(_)
                | AssistError::Timeout(_)
                | AssistError::Http(_)
                | AssistError::Json(_)
        )
    }
}

// Convert AssistError to HTTP responses for Axum
impl IntoResponse for AssistError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            AssistError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_request_error"),
            AssistError::Config(_) | AssistError::ConfigParsing(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
            }
            AssistError::TooManyRequests(_) => (StatusCode::TOO_MANY_REQUESTS, "rate_limit_error"),
            AssistError::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "overloaded_error"),
            AssistError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "timeout_error"),
            AssistError::Provider(_) | AssistError::Http(_) => (StatusCode::BAD_GATEWAY, "api_error"),
            AssistError::Places(_) => (StatusCode::BAD_GATEWAY, "places_error"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "api_error"),
        };

        let body = json!({
            "type": "error",
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AssistError>;
