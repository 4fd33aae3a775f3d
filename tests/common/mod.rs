//! Common test utilities for MedAssist
//!
//! Shared configuration builders and helpers used across integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use medassist::{gateway::StreamMode, routes, AppState, Config, GatewayClient, OcrClient};

/// Test configuration constants
pub mod constants {
    pub const TEST_ACCESS_KEY: &str = "test-ak";
    pub const TEST_SECRET_KEY: &str = "test-sk";
    pub const TEST_OCR_API_KEY: &str = "test-ocr-client-id";
    pub const TEST_OCR_SECRET_KEY: &str = "test-ocr-client-secret";
    pub const TEST_OCR_TOKEN: &str = "24.test-access-token";
    pub const TEST_IMAGE_URL: &str = "http://images.example.com/test.jpg";
    /// Nothing listens here; connections are refused immediately
    pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";
}

/// Config pointing both backends at mock servers, with credentials set
pub fn test_config(gateway_url: &str, ocr_url: &str) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        gateway_url: gateway_url.to_string(),
        gateway_access_key: Some(constants::TEST_ACCESS_KEY.to_string()),
        gateway_secret_key: Some(constants::TEST_SECRET_KEY.to_string()),
        gateway_timeout_seconds: None,
        gateway_max_attempts: 1,
        gateway_retry_backoff_ms: 1,
        gateway_stream_mode: StreamMode::FirstLine,
        ocr_api_url: ocr_url.to_string(),
        ocr_api_key: Some(constants::TEST_OCR_API_KEY.to_string()),
        ocr_secret_key: Some(constants::TEST_OCR_SECRET_KEY.to_string()),
        map_mcp_url: "https://mcp.example.com/sse".to_string(),
        map_mcp_key: Some("map-test-key".to_string()),
        agent_model: "test-model".to_string(),
    }
}

/// Same as [`test_config`] with every credential removed
pub fn unconfigured_config(gateway_url: &str, ocr_url: &str) -> Config {
    Config {
        gateway_access_key: None,
        gateway_secret_key: None,
        ocr_api_key: None,
        ocr_secret_key: None,
        ..test_config(gateway_url, ocr_url)
    }
}

pub fn gateway_client(config: &Config) -> GatewayClient {
    GatewayClient::new(reqwest::Client::new(), config)
}

pub fn ocr_client(config: &Config) -> OcrClient {
    OcrClient::new(reqwest::Client::new(), config)
}

/// Tool server running on the full router
pub fn test_server(config: Config) -> TestServer {
    let state = Arc::new(AppState::with_http_client(config, reqwest::Client::new()));
    TestServer::new(routes::create_router(state)).expect("Failed to create test server")
}
