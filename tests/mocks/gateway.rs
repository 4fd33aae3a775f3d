//! Mock health gateway for testing
//!
//! Wiremock server answering `POST /api/01bot/sse-gateway/stream`. The
//! [`ValidSignature`] matcher recomputes the authorization header from the
//! received body so tests only get a response when the request was signed
//! correctly.

use medassist::{
    gateway::GATEWAY_PATH,
    signing::{Credentials, RequestSigner, AUTH_HEADER},
};
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Match, Mock, MockServer, Request, ResponseTemplate,
};

use crate::common::constants::{TEST_ACCESS_KEY, TEST_SECRET_KEY};

/// Matches requests whose authorization header verifies against the body
pub struct ValidSignature {
    signer: RequestSigner,
}

impl ValidSignature {
    pub fn new(access_key: &str, secret_key: &str) -> Self {
        Self {
            signer: RequestSigner::new(Credentials::new(access_key, secret_key).unwrap()),
        }
    }
}

impl Match for ValidSignature {
    fn matches(&self, request: &Request) -> bool {
        let Some(authorization) = request
            .headers
            .get(AUTH_HEADER)
            .and_then(|v| v.to_str().ok())
        else {
            return false;
        };

        // ihcloud/<ak>/<timestamp>/300/<signature>
        let parts: Vec<&str> = authorization.split('/').collect();
        if parts.len() != 5 {
            return false;
        }
        let Ok(body) = String::from_utf8(request.body.clone()) else {
            return false;
        };

        let expected = self.signer.sign_encoded(request.url.path(), body, parts[2]);
        expected.authorization == authorization
    }
}

/// Mock gateway server wrapper
pub struct MockGatewayServer {
    server: MockServer,
}

impl MockGatewayServer {
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

    /// Bodies of all received requests, as sent
    pub async fn received_bodies(&self) -> Vec<String> {
        self.received_requests()
            .await
            .into_iter()
            .map(|r| String::from_utf8(r.body).unwrap())
            .collect()
    }

    fn signed_post() -> wiremock::MockBuilder {
        Mock::given(method("POST"))
            .and(path(GATEWAY_PATH))
            .and(header("content-type", "application/json"))
            .and(ValidSignature::new(TEST_ACCESS_KEY, TEST_SECRET_KEY))
    }

    /// Any correctly signed request gets this dialogue turn
    pub async fn mock_dialogue_turn(&self, scene: i64, session_id: &str, content: Value) {
        Self::signed_post()
            .respond_with(
                ResponseTemplate::new(200).set_body_json(dialogue_body(scene, session_id, content)),
            )
            .mount(&self.server)
            .await;
    }

    /// Dialogue turn returned only when the request carries `request_session_id`
    pub async fn mock_dialogue_turn_for_session(
        &self,
        request_session_id: &str,
        scene: i64,
        session_id: &str,
        content: Value,
    ) {
        Self::signed_post()
            .and(body_partial_json(json!({ "session_id": request_session_id })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(dialogue_body(scene, session_id, content)),
            )
            .mount(&self.server)
            .await;
    }

    /// Raw text body for any correctly signed request
    pub async fn mock_raw_response(&self, body: &str) {
        Self::signed_post()
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Streamed body for any correctly signed request
    pub async fn mock_stream_response(&self, body: &str) {
        Self::signed_post()
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/event-stream"),
            )
            .mount(&self.server)
            .await;
    }

    /// Error status for the next `times` requests
    pub async fn mock_status(&self, status: u16, body: &str, times: u64) {
        Mock::given(method("POST"))
            .and(path(GATEWAY_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .up_to_n_times(times)
            .mount(&self.server)
            .await;
    }

    /// Delayed response, for timeout tests
    pub async fn mock_slow_response(&self, delay: std::time::Duration) {
        Self::signed_post()
            .respond_with(ResponseTemplate::new(200).set_body_string("{}").set_delay(delay))
            .mount(&self.server)
            .await;
    }
}

pub fn dialogue_body(scene: i64, session_id: &str, content: Value) -> Value {
    json!({
        "result": [{
            "session_id": session_id,
            "messages": [{ "scene": scene, "content": content }]
        }]
    })
}
