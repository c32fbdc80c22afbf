// ABOUTME: Shared helpers for the integration tests
// ABOUTME: Provides an oneshot HTTP request helper and mock upstream plumbing

#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

use copiloto_server::config::{AssistantConfig, GatewayConfig, ServerConfig};
use copiloto_server::resources::ServerResources;
use copiloto_server::server::HttpServer;

// ============================================================================
// Request Helper
// ============================================================================

/// Helper to build and execute HTTP requests against axum routers
pub struct TestRequest {
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl TestRequest {
    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn post(uri: &str) -> Self {
        Self::new(Method::POST, uri)
    }

    pub fn options(uri: &str) -> Self {
        Self::new(Method::OPTIONS, uri)
    }

    fn new(method: Method, uri: &str) -> Self {
        Self {
            method,
            uri: uri.to_owned(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Add JSON body to the request
    pub fn json<T: Serialize>(mut self, data: &T) -> Self {
        self.body = Some(serde_json::to_vec(data).expect("Failed to serialize JSON"));
        self.headers.push((
            header::CONTENT_TYPE.as_str().to_owned(),
            "application/json".to_owned(),
        ));
        self
    }

    /// Add a raw (possibly invalid) body to the request
    pub fn raw_body(mut self, data: &[u8]) -> Self {
        self.body = Some(data.to_vec());
        self
    }

    /// Execute the request against an axum router
    pub async fn send(self, app: Router) -> TestResponse {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        for (key, value) in self.headers {
            builder = builder.header(key, value);
        }

        let request = builder
            .body(Body::from(self.body.unwrap_or_default()))
            .expect("Failed to build request");

        let response = app.oneshot(request).await.expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body")
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response wrapper with eager body
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl TestResponse {
    pub const fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json<T: serde::de::DeserializeOwned>(self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to deserialize JSON response")
    }

    pub fn text(self) -> String {
        String::from_utf8(self.body).expect("Failed to decode response as UTF-8")
    }
}

// ============================================================================
// Server Construction
// ============================================================================

/// Serve a mock upstream router on an ephemeral local port
pub async fn spawn_upstream(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock upstream");
    let addr = listener.local_addr().expect("Mock upstream has no address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Mock upstream failed");
    });
    addr
}

/// Configuration pointing both upstreams at the given mock addresses
pub fn test_config(assistant_addr: SocketAddr, gateway_addr: SocketAddr) -> ServerConfig {
    ServerConfig {
        http_port: 0,
        assistant: AssistantConfig {
            api_key: Some("sk-test".to_owned()),
            assistant_id: Some("asst_test".to_owned()),
            base_url: format!("http://{assistant_addr}/v1"),
            poll_interval_ms: 10,
            poll_budget_secs: 5,
        },
        gateway: GatewayConfig {
            api_key: Some("gw-test".to_owned()),
            base_url: format!("http://{gateway_addr}/v1"),
            model: "google/gemini-3-flash-preview".to_owned(),
        },
    }
}

/// Build the full application router over the given configuration
pub fn build_app(config: ServerConfig) -> Router {
    let resources = Arc::new(ServerResources::new(config).expect("Failed to build resources"));
    HttpServer::new(resources).router()
}
