//! Assistant server binary
//!
//! Run with: cargo run -p kb-assistant --bin kb-assistant-server

use kb_assistant::{config::AssistantConfig, server::AssistantServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kb_assistant=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AssistantConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!(
        "  - API key: {}",
        if config.pinecone.api_key_configured() { "set" } else { "missing" }
    );
    tracing::info!("  - Assistant: {}", config.pinecone.assistant_name);
    tracing::info!("  - Index: {}", config.pinecone.index_name);
    tracing::info!("  - MCP endpoint: {}", config.upstream.mcp_server_url);
    tracing::info!("  - Environment: {}", config.server.environment);

    // Create and start server
    let server = AssistantServer::new(config).await?;

    println!("\nServer starting...");
    println!("  Page: http://{}/", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /ask         - Ask a question (MCP, then assistant chat API)");
    println!("  POST /mcp/chat    - Direct MCP chat with options");
    println!("  POST /mcp/test    - MCP diagnostics");
    println!("  GET  /mcp/status  - MCP connection status");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
