//! Shared helpers for geneticllm-axum integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, header};
use geneticllm_axum::{CorsConfig, bootstrap_with_transport, create_router};
use geneticllm_core::transport::testing::FakeTransport;
use geneticllm_core::{Settings, UpstreamTransport};
use http_body_util::BodyExt;
use tokio::net::TcpListener;

pub const TEST_API_KEY: &str = "test-key-123";
pub const OTHER_API_KEY: &str = "test-key-456";
pub const TEST_MODEL: &str = "sachinbkale27/genetics-llm";
pub const TEST_SYSTEM_PROMPT: &str = "You are an expert in genetics and molecular biology.";

/// Settings with two API keys and the chat-completions router.
pub fn test_settings() -> Settings {
    Settings::new("hf_test_token", TEST_MODEL, TEST_SYSTEM_PROMPT)
        .with_api_keys(format!("{TEST_API_KEY},{OTHER_API_KEY}"))
}

/// Settings with authentication disabled.
pub fn dev_settings() -> Settings {
    Settings::new("hf_test_token", TEST_MODEL, TEST_SYSTEM_PROMPT)
}

pub fn router_with_transport(settings: &Settings, transport: Arc<dyn UpstreamTransport>) -> Router {
    create_router(
        bootstrap_with_transport(settings, transport),
        &CorsConfig::AllowAll,
    )
}

pub fn router_with(settings: &Settings, fake: &FakeTransport) -> Router {
    router_with_transport(settings, Arc::new(fake.clone()))
}

/// A chat-completions reply carrying `content`.
pub fn chat_completion_reply(content: &str) -> FakeTransport {
    FakeTransport::replying_json(
        200,
        &serde_json::json!({"choices": [{"message": {"role": "assistant", "content": content}}]}),
    )
}

/// `POST /api/v1/chat` with a raw body and optional key.
pub fn chat_request(body: impl Into<Body>, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/chat")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(body.into()).unwrap()
}

/// `POST /api/v1/chat` with a JSON body and optional key.
pub fn chat_json(body: &serde_json::Value, api_key: Option<&str>) -> Request<Body> {
    chat_request(body.to_string(), api_key)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Collect the response body as JSON.
pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap_or_else(|e| panic!("Expected valid JSON body: {e}"))
}

/// Serve `router` on an ephemeral localhost port.
pub async fn spawn_upstream(router: Router) -> SocketAddr {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}
