//! Startup probe of the assistant and index handles
//!
//! Runs once before the server starts. Any failure leaves the matching
//! handle disabled; nothing here can stop the process from serving.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::AssistantConfig;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// What the process could reach at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bootstrap {
    /// Assistant handle was reached
    pub assistant_available: bool,
    /// Data plane host reported for the assistant
    pub assistant_host: Option<String>,
    /// Index handle is usable
    pub index_available: bool,
}

#[derive(Debug, Deserialize)]
struct AssistantDescription {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    host: Option<String>,
}

impl Bootstrap {
    /// Everything disabled
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Probe the control plane for the configured assistant and index
    pub async fn probe(config: &AssistantConfig) -> Self {
        let Some(api_key) = config.pinecone.api_key.as_deref().filter(|k| !k.is_empty()) else {
            tracing::warn!("PINECONE_API_KEY is not set; assistant and index are disabled");
            return Self::disabled();
        };

        if !config.pinecone.probe_on_startup {
            tracing::info!("Startup probe disabled; assuming assistant is reachable");
            return Self {
                assistant_available: true,
                assistant_host: None,
                index_available: false,
            };
        }

        let client = match Client::builder().timeout(PROBE_TIMEOUT).build() {
            Ok(client) => client,
            Err(e) => {
                tracing::error!("Could not build probe client: {}", e);
                return Self::disabled();
            }
        };
        let base = config.pinecone.control_plane_url.trim_end_matches('/');
        let get = |url: String| {
            client
                .get(url)
                .header("Api-Key", api_key)
                .header("X-Pinecone-API-Version", &config.fallback.api_version)
                .send()
        };

        let assistant_url = format!("{}/assistant/assistants/{}", base, config.pinecone.assistant_name);
        let (assistant_available, assistant_host) = match get(assistant_url).await {
            Ok(resp) if resp.status().is_success() => {
                let description = resp.json::<AssistantDescription>().await.ok();
                let (status, host) = description
                    .map(|d| (d.status, d.host))
                    .unwrap_or((None, None));
                tracing::info!(
                    "Assistant '{}' connected (status: {})",
                    config.pinecone.assistant_name,
                    status.as_deref().unwrap_or("unknown")
                );
                (true, host)
            }
            Ok(resp) => {
                tracing::error!(
                    "Assistant '{}' unavailable: HTTP {}",
                    config.pinecone.assistant_name,
                    resp.status()
                );
                (false, None)
            }
            Err(e) => {
                tracing::error!("Error initializing assistant '{}': {}", config.pinecone.assistant_name, e);
                (false, None)
            }
        };

        let index_url = format!("{}/indexes/{}", base, config.pinecone.index_name);
        let index_available = match get(index_url).await {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!("Index '{}' connected", config.pinecone.index_name);
                true
            }
            Ok(resp) => {
                tracing::warn!(
                    "Could not connect to index '{}': HTTP {}",
                    config.pinecone.index_name,
                    resp.status()
                );
                false
            }
            Err(e) => {
                tracing::warn!("Could not connect to index '{}': {}", config.pinecone.index_name, e);
                false
            }
        };

        Self {
            assistant_available,
            assistant_host,
            index_available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer, api_key: Option<&str>) -> AssistantConfig {
        let mut config = AssistantConfig::default();
        config.pinecone.api_key = api_key.map(str::to_string);
        config.pinecone.control_plane_url = server.uri();
        config
    }

    #[tokio::test]
    async fn test_no_api_key_disables_everything() {
        let server = MockServer::start().await;
        let bootstrap = Bootstrap::probe(&config_for(&server, None)).await;

        assert_eq!(bootstrap, Bootstrap::disabled());
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_probe_reads_assistant_host() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/assistant/assistants/vb"))
            .and(header("Api-Key", "pk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "vb",
                "status": "Ready",
                "host": "https://assistant.example"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/indexes/veterans-benefits"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let bootstrap = Bootstrap::probe(&config_for(&server, Some("pk-test"))).await;

        assert!(bootstrap.assistant_available);
        assert_eq!(bootstrap.assistant_host.as_deref(), Some("https://assistant.example"));
        assert!(!bootstrap.index_available);
    }

    #[tokio::test]
    async fn test_reachability_ignores_fallback_switch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/assistant/assistants/vb"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "Ready"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/indexes/veterans-benefits"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let mut config = config_for(&server, Some("pk-test"));
        config.fallback.enabled = false;
        let bootstrap = Bootstrap::probe(&config).await;

        assert!(bootstrap.assistant_available);
        assert!(bootstrap.index_available);
    }
}
