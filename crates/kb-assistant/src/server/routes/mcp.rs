//! MCP endpoint routes: diagnostics and direct chat

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::generation::normalize;
use crate::server::state::AppState;
use crate::types::{AnswerEnvelope, AnswerSource, ChatRequest};
use crate::upstream::CallResult;

/// Body of `POST /mcp/test`
#[derive(Debug, Default, Deserialize)]
pub struct McpTestRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

fn sdk_status(available: bool) -> &'static str {
    if available {
        "connected"
    } else {
        "disconnected"
    }
}

/// POST /mcp/test - Call the MCP endpoint and show both normalized and raw output
pub async fn mcp_test(
    State(state): State<AppState>,
    payload: std::result::Result<Json<McpTestRequest>, JsonRejection>,
) -> Json<Value> {
    let prompt = payload
        .ok()
        .and_then(|Json(request)| request.prompt)
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| state.config().diagnostics.sample_prompt.clone());

    tracing::info!("Testing MCP server with prompt: {}", prompt);

    let result = state.upstream().call(&prompt, None).await;
    match &result {
        CallResult::Success(reply) => {
            let answer = normalize(&reply.body, Some(reply.response_time_ms));
            Json(json!({
                "success": true,
                "mcp_server_status": "working",
                "response": {
                    "content": answer.content,
                    "citations": answer.citations,
                    "metadata": answer.metadata,
                },
                "raw_response": result.to_json(),
            }))
        }
        CallResult::Failure(failure) => Json(json!({
            "success": false,
            "mcp_server_status": "failed",
            "error": failure.error,
            "code": failure.code(),
            "message": failure.message,
        })),
    }
}

/// GET /mcp/status - Probe the MCP endpoint and report connection details
pub async fn mcp_status(State(state): State<AppState>) -> Result<Json<Value>> {
    let config = state.config();
    let bootstrap = state.bootstrap();

    let result = state
        .upstream()
        .call(&config.diagnostics.status_prompt, None)
        .await;

    let mut status = json!({
        "mcp_server_url": config.upstream.mcp_server_url,
        "api_key_configured": config.pinecone.api_key_configured(),
        "connection_test": if result.is_success() { "success" } else { "failed" },
        "last_test_time": chrono::Utc::now().to_rfc3339(),
        "pinecone_sdk_status": sdk_status(bootstrap.assistant_available),
        "pinecone_index_status": sdk_status(bootstrap.index_available),
    });

    match &result {
        CallResult::Success(reply) => {
            let answer = normalize(&reply.body, Some(reply.response_time_ms));
            status["mcp_response_sample"] = json!({
                "has_content": answer.content.is_some(),
                "has_citations": !answer.citations.is_empty(),
                "has_metadata": true,
            });
        }
        CallResult::Failure(failure) => {
            status["connection_error"] = json!(failure.to_string());
        }
    }

    Ok(Json(status))
}

/// POST /mcp/chat - Direct MCP chat with caller-supplied generation options
pub async fn mcp_chat(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<AnswerEnvelope>> {
    let Json(request) = payload.map_err(|_| Error::bad_request("No JSON data provided"))?;
    let prompt = request.validated_prompt()?;

    let prefix: String = prompt.chars().take(100).collect();
    tracing::info!("MCP chat request: {}", prefix);
    tracing::debug!("Options: {:?}", request.options);

    let reply = state
        .upstream()
        .call(prompt, request.options.as_ref())
        .await
        .into_result()
        .map_err(Error::Upstream)?;

    let answer = normalize(&reply.body, Some(reply.response_time_ms));
    Ok(Json(AnswerEnvelope::new(
        answer.content,
        answer.citations,
        answer.metadata,
        AnswerSource::Upstream,
    )))
}
