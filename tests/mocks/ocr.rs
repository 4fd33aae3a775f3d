//! Mock OCR service for testing
//!
//! Serves the client-credentials token endpoint and the accurate text
//! recognition endpoint.

use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, Request, ResponseTemplate,
};

use crate::common::constants::{TEST_OCR_API_KEY, TEST_OCR_SECRET_KEY, TEST_OCR_TOKEN};

const TOKEN_PATH: &str = "/oauth/2.0/token";
const RECOGNIZE_PATH: &str = "/rest/2.0/ocr/v1/accurate_basic";

/// Mock OCR server wrapper
pub struct MockOcrServer {
    server: MockServer,
}

impl MockOcrServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub async fn received_requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Issue the test token for the test client credentials
    pub async fn mock_token(&self) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .and(query_param("grant_type", "client_credentials"))
            .and(query_param("client_id", TEST_OCR_API_KEY))
            .and(query_param("client_secret", TEST_OCR_SECRET_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": TEST_OCR_TOKEN,
                "expires_in": 2592000
            })))
            .mount(&self.server)
            .await;
    }

    /// Reject the token request the way the service does for bad credentials
    pub async fn mock_token_rejected(&self) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "invalid_client",
                "error_description": "unknown client id"
            })))
            .mount(&self.server)
            .await;
    }

    /// Recognize the given lines for requests carrying the test token
    pub async fn mock_words(&self, lines: &[&str]) {
        let words: Vec<Value> = lines.iter().map(|l| json!({ "words": l })).collect();
        self.mock_recognize(json!({
            "log_id": 1234567890,
            "words_result_num": words.len(),
            "words_result": words
        }))
        .await;
    }

    /// Respond to recognition with an arbitrary body
    pub async fn mock_recognize(&self, body: Value) {
        Mock::given(method("POST"))
            .and(path(RECOGNIZE_PATH))
            .and(query_param("access_token", TEST_OCR_TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }
}
