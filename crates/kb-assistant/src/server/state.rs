//! Application state for the assistant server

use std::sync::Arc;
use std::time::Instant;

use crate::bootstrap::Bootstrap;
use crate::config::AssistantConfig;
use crate::error::Result;
use crate::pipeline::AnswerPipeline;
use crate::providers::{AssistantChatClient, AssistantStrategy, McpStrategy};
use crate::upstream::UpstreamCaller;

/// Shared application state
///
/// Built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AssistantConfig,
    /// Startup probe results
    bootstrap: Bootstrap,
    /// MCP endpoint caller (also used directly by the /mcp routes)
    upstream: Arc<UpstreamCaller>,
    /// Ordered answer strategies for /ask
    pipeline: AnswerPipeline,
    /// Process start
    started_at: Instant,
}

impl AppState {
    /// Create application state, probing the control plane first
    pub async fn new(config: AssistantConfig) -> Result<Self> {
        tracing::info!("Initializing assistant application state...");
        let bootstrap = Bootstrap::probe(&config).await;
        Self::with_bootstrap(config, bootstrap)
    }

    /// Create application state from known probe results
    pub fn with_bootstrap(config: AssistantConfig, bootstrap: Bootstrap) -> Result<Self> {
        let upstream = Arc::new(UpstreamCaller::new(
            &config.upstream,
            config.pinecone.api_key.clone(),
        )?);
        tracing::info!("MCP endpoint: {}", upstream.endpoint());

        let fallback = match config.pinecone.api_key.clone() {
            Some(api_key)
                if config.fallback.enabled
                    && bootstrap.assistant_available
                    && !api_key.is_empty() =>
            {
                let host = bootstrap
                    .assistant_host
                    .as_deref()
                    .unwrap_or(&config.fallback.assistant_host);
                let client = AssistantChatClient::new(
                    &config.fallback,
                    host,
                    &config.pinecone.assistant_name,
                    api_key,
                )?;
                tracing::info!("Fallback enabled: {}", client.chat_url());
                AssistantStrategy::new(client)
            }
            _ => {
                if config.fallback.enabled {
                    tracing::warn!("Fallback disabled: assistant chat API not available");
                } else {
                    tracing::info!("Fallback disabled by configuration");
                }
                AssistantStrategy::disabled()
            }
        };

        let pipeline = AnswerPipeline::new()
            .with_strategy(Arc::new(McpStrategy::new(Arc::clone(&upstream))))
            .with_strategy(Arc::new(fallback));

        Ok(Self::from_parts(config, bootstrap, upstream, pipeline))
    }

    /// Assemble state from prebuilt parts
    pub fn from_parts(
        config: AssistantConfig,
        bootstrap: Bootstrap,
        upstream: Arc<UpstreamCaller>,
        pipeline: AnswerPipeline,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                bootstrap,
                upstream,
                pipeline,
                started_at: Instant::now(),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &AssistantConfig {
        &self.inner.config
    }

    /// Get startup probe results
    pub fn bootstrap(&self) -> &Bootstrap {
        &self.inner.bootstrap
    }

    /// Get the MCP endpoint caller
    pub fn upstream(&self) -> &UpstreamCaller {
        &self.inner.upstream
    }

    /// Get the answer pipeline
    pub fn pipeline(&self) -> &AnswerPipeline {
        &self.inner.pipeline
    }

    /// Seconds since the state was built
    pub fn uptime_secs(&self) -> u64 {
        self.inner.started_at.elapsed().as_secs()
    }
}
