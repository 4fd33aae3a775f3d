//! Structured logging for gateway calls
//!
//! Each call gets a short trace id so the signing, dispatch and retry log
//! lines of one tool invocation can be correlated.

use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Context for one gateway call
#[derive(Debug, Clone)]
pub struct GatewayCallContext {
    /// Short correlation id
    pub trace_id: String,
    /// When the call started
    pub start_time: Instant,
    /// Gateway route being called
    pub path: String,
    /// Remote model named in the envelope
    pub model: String,
    /// Whether a streamed response was requested
    pub streaming: bool,
    /// Whether the envelope continues an existing session
    pub continued_session: bool,
}

impl GatewayCallContext {
    pub fn new(path: &str, model: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(),
            start_time: Instant::now(),
            path: path.to_string(),
            model: model.to_string(),
            streaming: false,
            continued_session: false,
        }
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn with_session(mut self, session_id: &str) -> Self {
        self.continued_session = !session_id.is_empty();
        self
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    pub fn log_call_start(&self) {
        info!(
            trace_id = %self.trace_id,
            path = %self.path,
            model = %self.model,
            streaming = %self.streaming,
            continued_session = %self.continued_session,
            "Gateway call started"
        );
    }

    /// Log the signed request; the signature itself is never logged
    pub fn log_signed(&self, attempt: u32, content_md5: &str, body_len: usize) {
        debug!(
            trace_id = %self.trace_id,
            attempt = %attempt,
            content_md5 = %content_md5,
            body_len = %body_len,
            "Request signed"
        );
    }

    pub fn log_upstream_response(&self, status: u16) {
        info!(
            trace_id = %self.trace_id,
            path = %self.path,
            model = %self.model,
            status = %status,
            elapsed_ms = %self.elapsed_ms(),
            "Response received from gateway"
        );
    }

    pub fn log_retry(&self, attempt: u32, delay_ms: u128, reason: &str) {
        warn!(
            trace_id = %self.trace_id,
            path = %self.path,
            attempt = %attempt,
            delay_ms = %delay_ms,
            reason = %reason,
            elapsed_ms = %self.elapsed_ms(),
            "Retrying gateway call"
        );
    }

    pub fn log_error(&self, error: &str) {
        error!(
            trace_id = %self.trace_id,
            path = %self.path,
            model = %self.model,
            streaming = %self.streaming,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Gateway call failed"
        );
    }
}
