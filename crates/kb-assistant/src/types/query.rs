//! Request types for the question endpoints

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Generation options merged over the outbound payload.
///
/// Keys are passed through as-is; `temperature`, `max_tokens` and
/// `include_highlights` are the usual ones.
pub type CallOptions = Map<String, Value>;

/// Body of `POST /ask`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question to answer
    #[serde(default)]
    pub prompt: Option<String>,
}

impl AskRequest {
    /// The prompt, if present and not blank
    pub fn validated_prompt(&self) -> Result<&str> {
        validate_prompt(self.prompt.as_deref())
    }
}

/// Body of `POST /mcp/chat`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The question to answer
    #[serde(default)]
    pub prompt: Option<String>,
    /// Generation options forwarded to the MCP endpoint
    #[serde(default)]
    pub options: Option<CallOptions>,
}

impl ChatRequest {
    /// The prompt, if present and not blank
    pub fn validated_prompt(&self) -> Result<&str> {
        validate_prompt(self.prompt.as_deref())
    }
}

fn validate_prompt(prompt: Option<&str>) -> Result<&str> {
    match prompt {
        Some(p) if !p.trim().is_empty() => Ok(p),
        _ => Err(Error::bad_request("No prompt provided")),
    }
}
