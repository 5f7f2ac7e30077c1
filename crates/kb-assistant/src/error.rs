//! Error types for the assistant front-end

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::upstream::CallFailure;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, Error>;

/// One strategy's failure, as reported when the whole pipeline gives up
#[derive(Debug, Clone)]
pub struct StrategyFailure {
    /// Strategy name ("upstream", "fallback", ...)
    pub strategy: String,
    /// Human-readable cause
    pub cause: String,
}

/// Assistant front-end errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid client request (missing prompt, malformed body)
    #[error("{0}")]
    BadRequest(String),

    /// Upstream MCP call failed
    #[error("{0}")]
    Upstream(CallFailure),

    /// A strategy answered, but with no content
    #[error("{source_name} returned an empty answer")]
    EmptyAnswer { source_name: String },

    /// A strategy cannot be used in this process
    #[error("{0} is not available")]
    Unavailable(String),

    /// Fallback (assistant chat API) error
    #[error("Assistant chat failed: {0}")]
    Assistant(String),

    /// Every strategy in the pipeline failed
    #[error("All answer strategies failed: {}", describe_failures(.0))]
    AllStrategiesFailed(Vec<StrategyFailure>),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

fn describe_failures(failures: &[StrategyFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.strategy, f.cause))
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create an assistant (fallback path) error
    pub fn assistant(message: impl Into<String>) -> Self {
        Self::Assistant(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status and machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, serde_json::Value) {
        match self {
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, json!("config_error")),
            Error::BadRequest(_) => (StatusCode::BAD_REQUEST, json!(400)),
            Error::Upstream(failure) => (StatusCode::INTERNAL_SERVER_ERROR, failure.code()),
            Error::EmptyAnswer { .. } => (StatusCode::BAD_GATEWAY, json!("empty_answer")),
            Error::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, json!("unavailable")),
            Error::Assistant(_) => (StatusCode::BAD_GATEWAY, json!("assistant_error")),
            Error::AllStrategiesFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!("all_strategies_failed"),
            ),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, json!("io_error")),
            Error::Http(_) => (StatusCode::BAD_GATEWAY, json!("http_error")),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, json!("internal_error")),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!("Request failed ({}): {}", status, self);
        }

        let mut body = json!({
            "success": false,
            "error": self.to_string(),
            "code": code,
        });

        if let Error::Upstream(failure) = &self {
            body["message"] = json!(failure.message);
        }

        (status, Json(body)).into_response()
    }
}
