//! Outcome taxonomy for a single upstream call

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Why an upstream call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// HTTP 401, or no API key configured
    Auth,
    /// HTTP 429
    RateLimit,
    /// Any other non-200 status
    Server,
    /// Request exceeded the configured timeout
    Timeout,
    /// DNS or connection failure
    Connection,
    /// Anything else (undecodable body, request build error, ...)
    Unknown,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Auth => "auth",
            FailureKind::RateLimit => "rate_limit",
            FailureKind::Server => "server",
            FailureKind::Timeout => "timeout",
            FailureKind::Connection => "connection",
            FailureKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed upstream call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallFailure {
    /// Failure class
    pub kind: FailureKind,
    /// Short summary ("Authentication failed", "Server error: 503", ...)
    pub error: String,
    /// Detail (response body, transport error text)
    pub message: String,
    /// HTTP status, when the upstream answered at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl CallFailure {
    pub fn new(kind: FailureKind, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Wire code: the HTTP status when there is one, else the kind name
    pub fn code(&self) -> Value {
        match self.status {
            Some(status) => json!(status),
            None => json!(self.kind.as_str()),
        }
    }
}

impl fmt::Display for CallFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.error)
        } else {
            write!(f, "{} ({})", self.error, self.message)
        }
    }
}

/// A successful upstream call
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    /// Parsed JSON body
    pub body: Value,
    /// HTTP status (always 200)
    pub status_code: u16,
    /// Round-trip time
    pub response_time_ms: u64,
}

/// Outcome of one upstream call; exactly one form holds
#[derive(Debug, Clone, PartialEq)]
pub enum CallResult {
    Success(UpstreamReply),
    Failure(CallFailure),
}

impl CallResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CallResult::Success(_))
    }

    /// Failure kind, if the call failed
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            CallResult::Success(_) => None,
            CallResult::Failure(f) => Some(f.kind),
        }
    }

    /// Convert into a `Result`, for callers that want `?`
    pub fn into_result(self) -> Result<UpstreamReply, CallFailure> {
        match self {
            CallResult::Success(reply) => Ok(reply),
            CallResult::Failure(failure) => Err(failure),
        }
    }

    /// JSON view used by the diagnostic endpoints
    pub fn to_json(&self) -> Value {
        match self {
            CallResult::Success(reply) => json!({
                "success": true,
                "data": reply.body,
                "status_code": reply.status_code,
                "response_time_ms": reply.response_time_ms,
            }),
            CallResult::Failure(failure) => json!({
                "success": false,
                "error": failure.error,
                "code": failure.code(),
                "message": failure.message,
            }),
        }
    }
}
