//! Normalization of raw MCP response bodies
//!
//! The MCP endpoint has answered in several shapes over time (assistant
//! message, bare content, `response`, chat-completion `choices`). This module
//! reduces any of them to content, citations and metadata without touching
//! the network or any shared state.

use serde_json::{Map, Value};

use super::citation::extract_citations;
use crate::types::response::{Citation, ResponseMetadata};

/// Normalized answer extracted from an MCP response
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedAnswer {
    /// Answer text, if any shape yielded one
    pub content: Option<String>,
    /// Well-formed citations, in upstream order
    pub citations: Vec<Citation>,
    /// Best-effort metadata
    pub metadata: ResponseMetadata,
}

/// Content locations, in priority order
const CONTENT_PATHS: &[&[PathStep]] = &[
    &[PathStep::Key("message"), PathStep::Key("content")],
    &[PathStep::Key("content")],
    &[PathStep::Key("response")],
    &[
        PathStep::Key("choices"),
        PathStep::Index(0),
        PathStep::Key("message"),
        PathStep::Key("content"),
    ],
];

#[derive(Debug, Clone, Copy)]
enum PathStep {
    Key(&'static str),
    Index(usize),
}

fn resolve<'a>(body: &'a Value, path: &[PathStep]) -> Option<&'a Value> {
    path.iter().try_fold(body, |value, step| match step {
        PathStep::Key(key) => value.get(*key),
        PathStep::Index(i) => value.get(*i),
    })
}

/// First non-blank string found along [`CONTENT_PATHS`]
pub fn extract_content(body: &Value) -> Option<String> {
    CONTENT_PATHS
        .iter()
        .filter_map(|path| resolve(body, path).and_then(Value::as_str))
        .find(|text| !text.trim().is_empty())
        .map(str::to_string)
}

/// Metadata with defaults for anything missing
pub fn extract_metadata(body: &Value, response_time_ms: Option<u64>) -> ResponseMetadata {
    let present = |key: &str| body.get(key).filter(|v| !v.is_null()).cloned();

    ResponseMetadata {
        model: body
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string(),
        usage: present("usage").unwrap_or_else(|| Value::Object(Map::new())),
        created: present("created"),
        id: present("id"),
        response_time_ms,
    }
}

/// Normalize a raw MCP response body
pub fn normalize(body: &Value, response_time_ms: Option<u64>) -> NormalizedAnswer {
    NormalizedAnswer {
        content: extract_content(body),
        citations: extract_citations(body),
        metadata: extract_metadata(body, response_time_ms),
    }
}
