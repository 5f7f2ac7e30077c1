//! Health and debug routes

use axum::{extract::State, Json};
use serde_json::{json, Value};

use super::ROUTES;
use crate::server::state::AppState;

/// GET /health - Dependency availability; never fails
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let config = state.config();
    let bootstrap = state.bootstrap();

    Json(json!({
        "status": "healthy",
        "pinecone_available": bootstrap.assistant_available,
        "index_available": bootstrap.index_available,
        "mcp_endpoint": config.upstream.mcp_server_url,
        "mcp_api_key_configured": config.pinecone.api_key_configured(),
        "environment": config.server.environment,
        "endpoints": {
            "main": "/",
            "ask": "/ask",
            "health": "/health",
            "mcp_test": "/mcp/test",
            "mcp_status": "/mcp/status",
            "mcp_chat": "/mcp/chat",
            "debug": "/debug"
        }
    }))
}

/// GET /debug - Process and route snapshot
pub async fn debug(State(state): State<AppState>) -> Json<Value> {
    let bootstrap = state.bootstrap();

    let cwd = std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|e| format!("unavailable: {}", e));

    let files_in_cwd = match std::fs::read_dir(".") {
        Ok(entries) => {
            let mut names: Vec<String> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            json!(names)
        }
        Err(_) => json!("Directory not accessible"),
    };

    let routes: Vec<String> = ROUTES
        .iter()
        .map(|(method, path)| format!("{} {}", method, path))
        .collect();

    Json(json!({
        "app_name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "routes": routes,
        "answer_strategies": state.pipeline().strategy_names(),
        "current_working_directory": cwd,
        "files_in_cwd": files_in_cwd,
        "pinecone_assistant_status": if bootstrap.assistant_available { "connected" } else { "disconnected" },
        "pinecone_index_status": if bootstrap.index_available { "connected" } else { "disconnected" },
        "uptime_secs": state.uptime_secs(),
    }))
}

/// GET /test - Plain-text liveness
pub async fn test_route() -> &'static str {
    "Test route working! The server is running correctly."
}

/// GET /ping
pub async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong", "status": "ok" }))
}
