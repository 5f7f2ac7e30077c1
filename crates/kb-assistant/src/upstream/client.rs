//! MCP chat endpoint client
//!
//! Issues a single authenticated POST per call and folds every outcome,
//! including transport errors, into a [`CallResult`]. No retries: the
//! answer pipeline decides what happens after a failure.

use reqwest::{header, Client, StatusCode};
use serde_json::{json, Map, Value};
use std::time::{Duration, Instant};

use super::result::{CallFailure, CallResult, FailureKind, UpstreamReply};
use crate::config::UpstreamConfig;
use crate::error::Result;
use crate::types::CallOptions;

/// Characters of the prompt written to the log
const PROMPT_LOG_PREFIX: usize = 100;

/// Client for the assistant's MCP chat endpoint
#[derive(Clone)]
pub struct UpstreamCaller {
    /// HTTP client
    client: Client,
    /// Full chat endpoint URL
    endpoint: String,
    /// Bearer token
    api_key: Option<String>,
}

impl UpstreamCaller {
    /// Create a new caller
    pub fn new(config: &UpstreamConfig, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.chat_endpoint(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    /// Endpoint this caller posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether a bearer token is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build the outbound payload: defaults first, then caller options on top
    pub fn build_payload(prompt: &str, options: Option<&CallOptions>) -> Value {
        let mut payload = Map::new();
        payload.insert(
            "messages".to_string(),
            json!([{ "role": "user", "content": prompt }]),
        );
        payload.insert("include_highlights".to_string(), Value::Bool(true));
        payload.insert("stream".to_string(), Value::Bool(false));

        if let Some(options) = options {
            for (key, value) in options {
                payload.insert(key.clone(), value.clone());
            }
        }

        Value::Object(payload)
    }

    /// Send one prompt upstream and classify the outcome
    pub async fn call(&self, prompt: &str, options: Option<&CallOptions>) -> CallResult {
        let prompt_prefix: String = prompt.chars().take(PROMPT_LOG_PREFIX).collect();
        tracing::info!(endpoint = %self.endpoint, prompt = %prompt_prefix, "Calling MCP server");

        let Some(api_key) = self.api_key.as_deref() else {
            tracing::error!("MCP server call skipped: no API key configured");
            return CallResult::Failure(CallFailure::new(
                FailureKind::Auth,
                "Authentication failed",
                "Invalid or missing API key",
            ));
        };

        let payload = Self::build_payload(prompt, options);
        tracing::debug!("MCP payload: {}", payload);

        let start = Instant::now();
        let response = match self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return CallResult::Failure(classify_transport_error(&e)),
        };

        let status = response.status();
        tracing::info!(status = status.as_u16(), "MCP server responded");

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return CallResult::Failure(classify_transport_error(&e)),
        };
        let response_time_ms = start.elapsed().as_millis() as u64;

        classify_response(status, &text, response_time_ms)
    }
}

/// Map an HTTP status and body to a call outcome
fn classify_response(status: StatusCode, text: &str, response_time_ms: u64) -> CallResult {
    match status {
        StatusCode::OK => match serde_json::from_str::<Value>(text) {
            Ok(body) => {
                tracing::info!("MCP server response received in {}ms", response_time_ms);
                CallResult::Success(UpstreamReply {
                    body,
                    status_code: status.as_u16(),
                    response_time_ms,
                })
            }
            Err(e) => {
                tracing::error!("MCP server returned undecodable body: {}", e);
                CallResult::Failure(CallFailure::new(
                    FailureKind::Unknown,
                    "Invalid JSON response",
                    e.to_string(),
                ))
            }
        },
        StatusCode::UNAUTHORIZED => {
            tracing::error!("MCP server authentication failed - check API key");
            CallResult::Failure(
                CallFailure::new(
                    FailureKind::Auth,
                    "Authentication failed",
                    "Invalid or missing API key",
                )
                .with_status(status.as_u16()),
            )
        }
        StatusCode::TOO_MANY_REQUESTS => {
            tracing::warn!("MCP server rate limit exceeded");
            CallResult::Failure(
                CallFailure::new(
                    FailureKind::RateLimit,
                    "Rate limit exceeded",
                    "Too many requests, please try again later",
                )
                .with_status(status.as_u16()),
            )
        }
        other => {
            tracing::error!("MCP server error: {} - {}", other.as_u16(), text);
            CallResult::Failure(
                CallFailure::new(
                    FailureKind::Server,
                    format!("Server error: {}", other.as_u16()),
                    text,
                )
                .with_status(other.as_u16()),
            )
        }
    }
}

/// Map a transport-level error to a call failure
fn classify_transport_error(err: &reqwest::Error) -> CallFailure {
    if err.is_timeout() {
        tracing::warn!("MCP server request timed out");
        CallFailure::new(
            FailureKind::Timeout,
            "Request timeout",
            "Request took too long to complete",
        )
    } else if err.is_connect() {
        tracing::error!("MCP server connection error: {}", err);
        CallFailure::new(
            FailureKind::Connection,
            "Connection error",
            "Unable to connect to MCP server",
        )
    } else {
        tracing::error!("Error calling MCP server: {}", err);
        CallFailure::new(FailureKind::Unknown, "Unexpected error", err.to_string())
    }
}
