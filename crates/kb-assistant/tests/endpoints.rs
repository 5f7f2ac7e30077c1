//! Router tests with stubbed MCP and assistant chat endpoints

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    response::Response,
    Router,
};
use kb_assistant::{server::build_router, server::state::AppState, AssistantConfig, Bootstrap};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MCP_CHAT_PATH: &str = "/mcp/assistants/vb/chat";
const ASSISTANT_CHAT_PATH: &str = "/assistant/chat/vb";

/// Router wired to a stub server for both the MCP and the assistant chat API
fn stubbed_app(server: &MockServer) -> Router {
    let mut config = AssistantConfig::default();
    config.pinecone.api_key = Some("pk-test".to_string());
    config.upstream.mcp_server_url = format!("{}/mcp/assistants/vb", server.uri());
    config.upstream.timeout_secs = 5;
    config.fallback.timeout_secs = 5;

    let bootstrap = Bootstrap {
        assistant_available: true,
        assistant_host: Some(server.uri()),
        index_available: true,
    };
    build_router(AppState::with_bootstrap(config, bootstrap).unwrap())
}

/// Router with no credentials at all
fn unconfigured_app() -> Router {
    build_router(AppState::with_bootstrap(AssistantConfig::default(), Bootstrap::disabled()).unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn mount_mcp(server: &MockServer, template: ResponseTemplate, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(MCP_CHAT_PATH))
        .respond_with(template)
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_assistant(server: &MockServer, template: ResponseTemplate, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(ASSISTANT_CHAT_PATH))
        .and(header("Api-Key", "pk-test"))
        .respond_with(template)
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_ask_answers_from_upstream() {
    let server = MockServer::start().await;
    mount_mcp(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "message": {"content": "X"},
            "citations": [{"file": {"name": "guide.pdf"}, "page": 3, "url": "https://f/guide.pdf"}],
            "model": "gpt-4o"
        })),
        1,
    )
    .await;
    mount_assistant(&server, ResponseTemplate::new(200), 0).await;

    let response = stubbed_app(&server)
        .oneshot(post_json("/ask", json!({"prompt": "What is covered?"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["content"], "X");
    assert_eq!(body["source"], "upstream");
    assert_eq!(body["citations"][0]["file"], "guide.pdf");
    assert_eq!(body["metadata"]["model"], "gpt-4o");
}

#[tokio::test]
async fn test_ask_rejects_missing_prompt_without_calling_out() {
    let server = MockServer::start().await;
    mount_mcp(&server, ResponseTemplate::new(200), 0).await;
    mount_assistant(&server, ResponseTemplate::new(200), 0).await;

    let requests = [
        post_json("/ask", json!({})),
        post_json("/ask", json!({"prompt": ""})),
        post_json("/ask", json!({"prompt": "   "})),
        Request::builder()
            .method("POST")
            .uri("/ask")
            .body(Body::empty())
            .unwrap(),
    ];

    for request in requests {
        let response = stubbed_app(&server).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert!(!body["error"].as_str().unwrap_or_default().is_empty());
    }

    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_ask_falls_back_after_auth_failure() {
    let server = MockServer::start().await;
    mount_mcp(&server, ResponseTemplate::new(401), 1).await;
    mount_assistant(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "chat-9",
            "model": "gpt-4o",
            "message": {"role": "assistant", "content": "Y"},
            "citations": [{
                "position": 4,
                "references": [{
                    "file": {"name": "manual.pdf", "signed_url": "https://files.example/manual.pdf"},
                    "pages": [5]
                }]
            }]
        })),
        1,
    )
    .await;

    let response = stubbed_app(&server)
        .oneshot(post_json("/ask", json!({"prompt": "What is covered?"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["content"], "Y");
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["citations"][0]["file"], "manual.pdf");
    assert_eq!(body["citations"][0]["url"], "https://files.example/manual.pdf#page=5");
    assert_eq!(body["metadata"]["id"], "chat-9");
}

#[tokio::test]
async fn test_ask_falls_back_on_empty_upstream_content() {
    let server = MockServer::start().await;
    mount_mcp(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"message": {"content": ""}})),
        1,
    )
    .await;
    mount_assistant(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"message": {"content": "Y"}})),
        1,
    )
    .await;

    let response = stubbed_app(&server)
        .oneshot(post_json("/ask", json!({"prompt": "anything"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["content"], "Y");
    assert_eq!(body["source"], "fallback");
}

#[tokio::test]
async fn test_ask_reports_both_failures() {
    let server = MockServer::start().await;
    mount_mcp(&server, ResponseTemplate::new(503).set_body_string("maintenance"), 1).await;
    mount_assistant(&server, ResponseTemplate::new(500).set_body_string("assistant down"), 1).await;

    let response = stubbed_app(&server)
        .oneshot(post_json("/ask", json!({"prompt": "anything"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("upstream: Server error: 503"), "{}", error);
    assert!(error.contains("fallback: Assistant chat failed"), "{}", error);
    assert!(error.contains("assistant down"), "{}", error);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_ask_without_credentials_fails_cleanly() {
    let response = unconfigured_app()
        .oneshot(post_json("/ask", json!({"prompt": "anything"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("upstream: Authentication failed"));
    assert!(error.contains("fallback: not available"));
}

#[tokio::test]
async fn test_health_without_credentials() {
    let response = unconfigured_app().oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["pinecone_available"], false);
    assert_eq!(body["index_available"], false);
    assert_eq!(body["mcp_api_key_configured"], false);
    assert_eq!(body["environment"], "production");
    assert_eq!(body["endpoints"]["ask"], "/ask");
}

#[tokio::test]
async fn test_mcp_chat_passes_options_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MCP_CHAT_PATH))
        .and(body_partial_json(json!({"temperature": 0.7, "max_tokens": 1000})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Z"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = stubbed_app(&server)
        .oneshot(post_json(
            "/mcp/chat",
            json!({"prompt": "hi", "options": {"temperature": 0.7, "max_tokens": 1000}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["content"], "Z");
    assert_eq!(body["source"], "upstream");
}

#[tokio::test]
async fn test_mcp_chat_validation_and_upstream_failure() {
    let server = MockServer::start().await;
    mount_mcp(&server, ResponseTemplate::new(429), 1).await;

    let app = stubbed_app(&server);

    let missing = app
        .clone()
        .oneshot(post_json("/mcp/chat", json!({"options": {}})))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(missing).await["error"], "No prompt provided");

    let limited = app
        .oneshot(post_json("/mcp/chat", json!({"prompt": "hi"})))
        .await
        .unwrap();
    assert_eq!(limited.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(limited).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 429);
}

#[tokio::test]
async fn test_mcp_test_reports_failure_in_body() {
    let server = MockServer::start().await;
    mount_mcp(&server, ResponseTemplate::new(401), 1).await;

    let response = stubbed_app(&server)
        .oneshot(post_json("/mcp/test", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["mcp_server_status"], "failed");
    assert_eq!(body["code"], 401);
}

#[tokio::test]
async fn test_mcp_test_uses_sample_prompt_and_shows_raw_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MCP_CHAT_PATH))
        .and(body_partial_json(json!({
            "messages": [{"role": "user", "content": "Hello, can you tell me about veterans benefits?"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": "Sure"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = stubbed_app(&server)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/mcp/test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["mcp_server_status"], "working");
    assert_eq!(body["response"]["content"], "Sure");
    assert_eq!(body["raw_response"]["data"]["content"], "Sure");
    assert_eq!(body["raw_response"]["status_code"], 200);
}

#[tokio::test]
async fn test_mcp_status_probe() {
    let server = MockServer::start().await;
    mount_mcp(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"message": {"content": "pong"}})),
        1,
    )
    .await;

    let response = stubbed_app(&server).oneshot(get("/mcp/status")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["connection_test"], "success");
    assert_eq!(body["api_key_configured"], true);
    assert_eq!(body["pinecone_sdk_status"], "connected");
    assert_eq!(body["mcp_response_sample"]["has_content"], true);
    assert_eq!(body["mcp_response_sample"]["has_citations"], false);
}

#[tokio::test]
async fn test_diagnostic_routes() {
    let app = unconfigured_app();

    let ping = json_body(app.clone().oneshot(get("/ping")).await.unwrap()).await;
    assert_eq!(ping, json!({"message": "pong", "status": "ok"}));

    let test = app.clone().oneshot(get("/test")).await.unwrap();
    assert_eq!(test.status(), StatusCode::OK);

    let debug = json_body(app.clone().oneshot(get("/debug")).await.unwrap()).await;
    assert_eq!(debug["pinecone_assistant_status"], "disconnected");
    assert!(debug["routes"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r == "POST /ask"));
    assert_eq!(debug["answer_strategies"], json!(["upstream", "fallback"]));

    let page = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    let html = to_bytes(page.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&html).contains("fetch('/ask'"));

    let missing = app.oneshot(get("/nope")).await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(missing).await["success"], false);
}

#[tokio::test]
async fn test_fallback_switch_does_not_hide_reachable_assistant() {
    let server = MockServer::start().await;
    mount_mcp(&server, ResponseTemplate::new(401), 1).await;
    mount_assistant(&server, ResponseTemplate::new(200), 0).await;

    let mut config = AssistantConfig::default();
    config.pinecone.api_key = Some("pk-test".to_string());
    config.upstream.mcp_server_url = format!("{}/mcp/assistants/vb", server.uri());
    config.fallback.enabled = false;
    let bootstrap = Bootstrap {
        assistant_available: true,
        assistant_host: Some(server.uri()),
        index_available: true,
    };
    let app = build_router(AppState::with_bootstrap(config, bootstrap).unwrap());

    let health = json_body(app.clone().oneshot(get("/health")).await.unwrap()).await;
    assert_eq!(health["pinecone_available"], true);

    let debug = json_body(app.clone().oneshot(get("/debug")).await.unwrap()).await;
    assert_eq!(debug["pinecone_assistant_status"], "connected");

    let response = app
        .oneshot(post_json("/ask", json!({"prompt": "anything"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("fallback: not available"));
}
