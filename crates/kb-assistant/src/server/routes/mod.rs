//! Routes for the assistant server

pub mod ask;
pub mod health;
pub mod mcp;
pub mod page;

use axum::{
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Every route served, as (method, path)
pub const ROUTES: &[(&str, &str)] = &[
    ("GET", "/"),
    ("POST", "/ask"),
    ("GET", "/health"),
    ("GET", "/debug"),
    ("GET", "/test"),
    ("GET", "/ping"),
    ("POST", "/mcp/test"),
    ("GET", "/mcp/status"),
    ("POST", "/mcp/chat"),
];

/// Build all routes
pub fn routes() -> Router<AppState> {
    Router::new()
        // Presentation
        .route("/", get(page::index))
        // Question answering (MCP first, then assistant chat API)
        .route("/ask", post(ask::ask))
        // Health and diagnostics
        .route("/health", get(health::health))
        .route("/debug", get(health::debug))
        .route("/test", get(health::test_route))
        .route("/ping", get(health::ping))
        // MCP endpoint diagnostics and direct access
        .route("/mcp/test", post(mcp::mcp_test))
        .route("/mcp/status", get(mcp::mcp_status))
        .route("/mcp/chat", post(mcp::mcp_chat))
}
