//! Configuration for the assistant front-end
//!
//! Defaults come from [`AssistantConfig::default`], an optional TOML file
//! named by `KB_ASSISTANT_CONFIG` is layered on top, and environment
//! variables win last.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AssistantConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Pinecone credentials and resource names
    #[serde(default)]
    pub pinecone: PineconeConfig,
    /// MCP upstream (primary path) configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Assistant chat API (fallback path) configuration
    #[serde(default)]
    pub fallback: FallbackConfig,
    /// Diagnostic endpoint configuration
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Deployment environment name reported by /health
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            enable_cors: true,
            environment: "production".to_string(),
        }
    }
}

/// Pinecone credentials and resource names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PineconeConfig {
    /// API key; `None` degrades the process instead of failing startup
    pub api_key: Option<String>,
    /// Assistant name
    pub assistant_name: String,
    /// Index name probed at startup
    pub index_name: String,
    /// Control plane base URL (assistant and index descriptions)
    pub control_plane_url: String,
    /// Probe the control plane at startup
    pub probe_on_startup: bool,
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            assistant_name: "vb".to_string(),
            index_name: "veterans-benefits".to_string(),
            control_plane_url: "https://api.pinecone.io".to_string(),
            probe_on_startup: true,
        }
    }
}

impl PineconeConfig {
    /// Whether a non-empty API key is configured
    pub fn api_key_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// MCP upstream configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// MCP assistant URL; the chat endpoint is `{mcp_server_url}/chat`
    pub mcp_server_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header sent upstream
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            mcp_server_url: "https://prod-1-data.ke.pinecone.io/mcp/assistants/vb".to_string(),
            timeout_secs: 60,
            user_agent: format!("kb-assistant/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl UpstreamConfig {
    /// Full chat endpoint URL
    pub fn chat_endpoint(&self) -> String {
        format!("{}/chat", self.mcp_server_url.trim_end_matches('/'))
    }
}

/// Assistant chat API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Use the assistant chat API when the MCP call fails
    pub enabled: bool,
    /// Data plane host; replaced by the host reported at startup when available
    pub assistant_host: String,
    /// Value of the `X-Pinecone-API-Version` header
    pub api_version: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            assistant_host: "https://prod-1-data.ke.pinecone.io".to_string(),
            api_version: "2025-04".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Diagnostic endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Prompt used by /mcp/test when the request has none
    pub sample_prompt: String,
    /// Prompt used by /mcp/status to probe the upstream
    pub status_prompt: String,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            sample_prompt: "Hello, can you tell me about veterans benefits?".to_string(),
            status_prompt: "Test connection".to_string(),
        }
    }
}

/// Source of environment values, so overlays can be tested without touching
/// the process environment
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// Process environment
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

impl<S: std::hash::BuildHasher> EnvSource for std::collections::HashMap<String, String, S> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned().filter(|v| !v.is_empty())
    }
}

impl AssistantConfig {
    /// Load configuration the way the server binary does: dotenv file,
    /// optional TOML file, then environment overrides
    pub fn load() -> Result<Self> {
        let env_file =
            std::env::var("KB_ASSISTANT_ENV_FILE").unwrap_or_else(|_| ".env".to_string());
        match dotenvy::from_filename(&env_file) {
            Ok(path) => tracing::info!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => tracing::debug!("No env file at {}", env_file),
            Err(e) => tracing::warn!("Could not read env file {}: {}", env_file, e),
        }

        let mut config = match std::env::var("KB_ASSISTANT_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_env(&ProcessEnv)?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse TOML configuration text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self, env: &impl EnvSource) -> Result<()> {
        if let Some(key) = env.var("PINECONE_API_KEY") {
            self.pinecone.api_key = Some(key);
        }
        if let Some(name) = env.var("PINECONE_INDEX_NAME") {
            self.pinecone.index_name = name;
        }
        if let Some(name) = env.var("PINECONE_ASSISTANT_NAME") {
            self.pinecone.assistant_name = name;
        }
        if let Some(url) = env.var("MCP_SERVER_URL") {
            self.upstream.mcp_server_url = url;
        }
        if let Some(host) = env.var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = env.var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("Invalid PORT: {}", port)))?;
        }
        if let Some(environment) = env.var("APP_ENV") {
            self.server.environment = environment;
        }
        if let Some(secs) = env.var("UPSTREAM_TIMEOUT_SECS") {
            self.upstream.timeout_secs = secs
                .parse()
                .map_err(|_| Error::Config(format!("Invalid UPSTREAM_TIMEOUT_SECS: {}", secs)))?;
        }
        Ok(())
    }
}
