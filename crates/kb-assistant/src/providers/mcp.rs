//! MCP endpoint strategy
//!
//! Wraps the [`UpstreamCaller`] so the direct call can sit in the answer
//! pipeline.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generation::normalize;
use crate::types::{AnswerEnvelope, AnswerSource, CallOptions};
use crate::upstream::{CallResult, UpstreamCaller};

use super::strategy::AnswerStrategy;

/// Primary strategy: MCP chat endpoint plus response normalization
pub struct McpStrategy {
    caller: Arc<UpstreamCaller>,
}

impl McpStrategy {
    /// Create from a shared caller
    pub fn new(caller: Arc<UpstreamCaller>) -> Self {
        Self { caller }
    }
}

#[async_trait]
impl AnswerStrategy for McpStrategy {
    async fn answer(&self, prompt: &str, options: Option<&CallOptions>) -> Result<AnswerEnvelope> {
        let reply = match self.caller.call(prompt, options).await {
            CallResult::Success(reply) => reply,
            CallResult::Failure(failure) => {
                tracing::warn!("MCP server failed: {}", failure);
                return Err(Error::Upstream(failure));
            }
        };

        let answer = normalize(&reply.body, Some(reply.response_time_ms));
        let envelope = AnswerEnvelope::new(
            answer.content,
            answer.citations,
            answer.metadata,
            AnswerSource::Upstream,
        );

        if !envelope.has_content() {
            tracing::warn!("MCP server answered without content");
            return Err(Error::EmptyAnswer {
                source_name: self.name().to_string(),
            });
        }

        tracing::info!(
            "Processed MCP server response ({} citations)",
            envelope.citations.len()
        );
        Ok(envelope)
    }

    fn name(&self) -> &str {
        "upstream"
    }
}
