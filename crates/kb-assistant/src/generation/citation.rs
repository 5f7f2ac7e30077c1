//! Defensive citation extraction
//!
//! Every field lookup yields absent, present, or malformed. Absent fields
//! take the [`Citation`] defaults; a malformed field rejects only the
//! citation it belongs to.

use serde_json::{Map, Value};
use std::fmt;

use crate::types::response::Citation;

/// Why a single citation was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitationDefect {
    /// The citation entry is not a JSON object
    NotAnObject,
    /// A field is present with an unexpected type
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    /// The entry lacks a structure the path requires (references, pages)
    Missing(&'static str),
    /// The entry does not match the expected citation model
    Invalid(String),
}

impl fmt::Display for CitationDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CitationDefect::NotAnObject => f.write_str("citation is not an object"),
            CitationDefect::WrongType { field, expected } => {
                write!(f, "field '{}' is not {}", field, expected)
            }
            CitationDefect::Missing(what) => write!(f, "citation has no {}", what),
            CitationDefect::Invalid(reason) => write!(f, "invalid citation: {}", reason),
        }
    }
}

/// Look up `key`; `null` counts as absent
fn lookup<'a, T>(
    obj: &'a Map<String, Value>,
    key: &'static str,
    expected: &'static str,
    cast: impl FnOnce(&'a Value) -> Option<T>,
) -> Result<Option<T>, CitationDefect> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => cast(value)
            .map(Some)
            .ok_or(CitationDefect::WrongType { field: key, expected }),
    }
}

/// Parse one entry of an MCP response's `citations` array
pub fn parse_citation(value: &Value) -> Result<Citation, CitationDefect> {
    let obj = value.as_object().ok_or(CitationDefect::NotAnObject)?;
    let defaults = Citation::default();

    // An explicit null file cannot be dereferenced for its name
    if matches!(obj.get("file"), Some(Value::Null)) {
        return Err(CitationDefect::WrongType {
            field: "file",
            expected: "an object",
        });
    }
    let source_file = match lookup(obj, "file", "an object", Value::as_object)? {
        Some(file) => lookup(file, "name", "a string", Value::as_str)?,
        None => None,
    };

    Ok(Citation {
        source_file: source_file.map(str::to_string).unwrap_or(defaults.source_file),
        page: lookup(obj, "page", "a page number", Value::as_u64)?.unwrap_or(defaults.page),
        url: lookup(obj, "url", "a string", Value::as_str)?
            .map(str::to_string)
            .unwrap_or(defaults.url),
        excerpt: lookup(obj, "text", "a string", Value::as_str)?
            .map(str::to_string)
            .unwrap_or(defaults.excerpt),
        confidence: lookup(obj, "confidence", "a number", Value::as_f64)?
            .unwrap_or(defaults.confidence),
    })
}

/// Extract every well-formed citation from a raw MCP response body
pub fn extract_citations(body: &Value) -> Vec<Citation> {
    let entries = match body.get("citations") {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            tracing::warn!("Ignoring 'citations': not an array");
            return Vec::new();
        }
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| match parse_citation(entry) {
            Ok(citation) => Some(citation),
            Err(defect) => {
                tracing::warn!("Skipping citation {}: {}", i, defect);
                None
            }
        })
        .collect()
}

/// Build a link to a specific page of a signed file URL
pub fn page_url(signed_url: Option<&str>, page: u64) -> String {
    match signed_url {
        Some(url) if !url.is_empty() => format!("{}#page={}", url, page),
        _ => Citation::NO_URL.to_string(),
    }
}
