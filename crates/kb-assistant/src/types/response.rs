//! Response types returned to the presentation layer

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Citation supporting part of an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Source filename
    #[serde(rename = "file")]
    pub source_file: String,
    /// Page number
    pub page: u64,
    /// Link to the source (signed URL with page fragment when known)
    pub url: String,
    /// Supporting excerpt
    #[serde(rename = "text")]
    pub excerpt: String,
    /// Confidence reported by the assistant (0.0 when unknown)
    pub confidence: f64,
}

impl Citation {
    pub const UNKNOWN_FILE: &'static str = "Unknown";
    pub const DEFAULT_PAGE: u64 = 1;
    pub const NO_URL: &'static str = "#";
}

impl Default for Citation {
    fn default() -> Self {
        Self {
            source_file: Self::UNKNOWN_FILE.to_string(),
            page: Self::DEFAULT_PAGE,
            url: Self::NO_URL.to_string(),
            excerpt: String::new(),
            confidence: 0.0,
        }
    }
}

/// Best-effort metadata about the answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Model that produced the answer
    pub model: String,
    /// Token usage as reported upstream
    pub usage: Value,
    /// Creation timestamp as reported upstream
    pub created: Option<Value>,
    /// Upstream response id
    pub id: Option<Value>,
    /// Round-trip time measured by this process
    pub response_time_ms: Option<u64>,
}

impl Default for ResponseMetadata {
    fn default() -> Self {
        Self {
            model: "unknown".to_string(),
            usage: Value::Object(Map::new()),
            created: None,
            id: None,
            response_time_ms: None,
        }
    }
}

/// Which call path produced an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    /// Direct MCP endpoint call
    Upstream,
    /// Assistant chat API
    Fallback,
}

impl AnswerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerSource::Upstream => "upstream",
            AnswerSource::Fallback => "fallback",
        }
    }
}

/// Answer returned to callers; the schema does not depend on the call path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEnvelope {
    /// Always true; failures are reported through the error body
    pub success: bool,
    /// Answer text
    pub content: Option<String>,
    /// Citations in upstream order
    pub citations: Vec<Citation>,
    /// Answer metadata
    pub metadata: ResponseMetadata,
    /// Call path that produced the answer
    pub source: AnswerSource,
}

impl AnswerEnvelope {
    /// Create a successful envelope
    pub fn new(
        content: Option<String>,
        citations: Vec<Citation>,
        metadata: ResponseMetadata,
        source: AnswerSource,
    ) -> Self {
        Self {
            success: true,
            content,
            citations,
            metadata,
            source,
        }
    }

    /// Whether the envelope carries non-blank answer text
    pub fn has_content(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}
