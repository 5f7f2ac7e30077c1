//! Assistant chat API client (fallback path)
//!
//! Talks to the assistant's own chat route, the one the vendor SDK wraps,
//! and maps its citation model onto [`Citation`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::{Duration, Instant};

use crate::config::FallbackConfig;
use crate::error::{Error, Result};
use crate::generation::citation::{page_url, CitationDefect};
use crate::types::{AnswerEnvelope, AnswerSource, CallOptions, Citation, ResponseMetadata};

use super::strategy::AnswerStrategy;

/// Assistant chat API client
pub struct AssistantChatClient {
    client: Client,
    chat_url: String,
    api_key: String,
    api_version: String,
}

/// Chat response as returned by the assistant API
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub message: Option<ChatMessage>,
    /// Kept raw so one bad entry cannot fail the whole response
    #[serde(default)]
    pub citations: Value,
    #[serde(default)]
    pub usage: Option<Value>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssistantCitation {
    #[serde(default)]
    references: Vec<AssistantReference>,
}

#[derive(Debug, Deserialize)]
struct AssistantReference {
    file: AssistantFile,
    #[serde(default)]
    pages: Vec<u64>,
    #[serde(default)]
    highlight: Option<Highlight>,
}

#[derive(Debug, Deserialize)]
struct AssistantFile {
    name: String,
    #[serde(default)]
    signed_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Highlight {
    #[serde(default)]
    content: String,
}

impl AssistantChatClient {
    /// Create a client for `{host}/assistant/chat/{assistant_name}`
    pub fn new(
        config: &FallbackConfig,
        host: &str,
        assistant_name: &str,
        api_key: String,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let host = host.trim_end_matches('/');
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };

        Ok(Self {
            client,
            chat_url: format!("{}/assistant/chat/{}", host, assistant_name),
            api_key,
            api_version: config.api_version.clone(),
        })
    }

    /// Chat endpoint URL
    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Send one user message with highlights enabled
    pub async fn chat(&self, prompt: &str) -> Result<ChatResponse> {
        let request = json!({
            "messages": [{ "role": "user", "content": prompt }],
            "include_highlights": true,
            "stream": false,
        });

        let response = self
            .client
            .post(&self.chat_url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", &self.api_version)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::assistant(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::assistant(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| Error::assistant(format!("failed to parse response: {}", e)))
    }
}

/// Map one assistant citation onto a [`Citation`]
fn convert_citation(value: &Value) -> std::result::Result<Citation, CitationDefect> {
    let citation: AssistantCitation = serde_json::from_value(value.clone())
        .map_err(|e| CitationDefect::Invalid(e.to_string()))?;

    let reference = citation
        .references
        .into_iter()
        .next()
        .ok_or(CitationDefect::Missing("references"))?;
    let page = *reference
        .pages
        .first()
        .ok_or(CitationDefect::Missing("pages"))?;

    Ok(Citation {
        url: page_url(reference.file.signed_url.as_deref(), page),
        source_file: reference.file.name,
        page,
        excerpt: reference.highlight.map(|h| h.content).unwrap_or_default(),
        confidence: 0.0,
    })
}

/// Extract citations from a chat response, skipping any that do not fit
pub fn extract_assistant_citations(response: &ChatResponse) -> Vec<Citation> {
    let Some(entries) = response.citations.as_array() else {
        if !response.citations.is_null() {
            tracing::warn!("Ignoring assistant citations: not an array");
        }
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| match convert_citation(entry) {
            Ok(citation) => Some(citation),
            Err(defect) => {
                tracing::warn!("Skipping assistant citation {}: {}", i, defect);
                None
            }
        })
        .collect()
}

/// Fallback strategy backed by the assistant chat API
pub struct AssistantStrategy {
    client: Option<AssistantChatClient>,
}

impl AssistantStrategy {
    /// Create an available strategy
    pub fn new(client: AssistantChatClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Create a strategy that reports itself unavailable
    pub fn disabled() -> Self {
        Self { client: None }
    }
}

#[async_trait]
impl AnswerStrategy for AssistantStrategy {
    async fn answer(&self, prompt: &str, _options: Option<&CallOptions>) -> Result<AnswerEnvelope> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| Error::Unavailable("Assistant chat API".to_string()))?;

        tracing::info!("Falling back to assistant chat API at {}", client.chat_url());
        let start = Instant::now();
        let response = client.chat(prompt).await?;
        let response_time_ms = start.elapsed().as_millis() as u64;

        let citations = extract_assistant_citations(&response);
        let metadata = ResponseMetadata {
            model: response.model.clone().unwrap_or_else(|| "unknown".to_string()),
            usage: response
                .usage
                .clone()
                .unwrap_or_else(|| Value::Object(Map::new())),
            created: None,
            id: response.id.clone().map(Value::String),
            response_time_ms: Some(response_time_ms),
        };
        let content = response.message.and_then(|m| m.content);

        let envelope = AnswerEnvelope::new(content, citations, metadata, AnswerSource::Fallback);
        if !envelope.has_content() {
            return Err(Error::EmptyAnswer {
                source_name: self.name().to_string(),
            });
        }

        tracing::info!(
            "Assistant chat API answered ({} citations, finish_reason: {:?})",
            envelope.citations.len(),
            response.finish_reason
        );
        Ok(envelope)
    }

    fn is_available(&self) -> bool {
        self.client.is_some()
    }

    fn name(&self) -> &str {
        "fallback"
    }
}
