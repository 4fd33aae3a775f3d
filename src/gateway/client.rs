//! Gateway dispatcher
//!
//! Signs envelopes and POSTs them to the health gateway. One call is one
//! HTTP round trip unless a retry policy is configured; no state survives
//! between calls.

use std::str::FromStr;
use std::time::Duration;

use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    config::Config,
    gateway::{logging::GatewayCallContext, DialogueTurn, Envelope},
    routes::metrics::record_gateway_call,
    signing::{Credentials, RequestSigner, SigningError, AUTH_HEADER},
    streaming::LineBuffer,
};

/// Route shared by the dialogue, skin diagnosis and drug QA APIs
pub const GATEWAY_PATH: &str = "/api/01bot/sse-gateway/stream";

/// Per-call failures
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Credentials missing; no request was sent
    #[error(transparent)]
    Configuration(#[from] SigningError),

    #[error("failed to encode request body: {0}")]
    Encode(serde_json::Error),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("invalid JSON in gateway response: {0}")]
    Decode(serde_json::Error),

    #[error("gateway response is missing {0}")]
    MissingField(&'static str),

    #[error("gateway stream ended without data")]
    EmptyStream,
}

impl DispatchError {
    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            DispatchError::Transport(e) => e.is_timeout() || e.is_connect(),
            DispatchError::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

/// How a streamed response body is consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamMode {
    /// Return the first line and drop the rest of the stream
    #[default]
    FirstLine,
    /// Read the whole stream and return every line joined by `\n`
    Full,
}

#[derive(Debug, Error)]
#[error("unknown stream mode '{0}', expected 'first-line' or 'full'")]
pub struct ParseStreamModeError(String);

impl FromStr for StreamMode {
    type Err = ParseStreamModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first-line" | "first_line" => Ok(StreamMode::FirstLine),
            "full" => Ok(StreamMode::Full),
            other => Err(ParseStreamModeError(other.to_string())),
        }
    }
}

/// Retry behaviour for gateway calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    /// Every call is at-most-once
    #[default]
    None,
    /// Retry transient failures, doubling `backoff` after each attempt
    Bounded { max_attempts: u32, backoff: Duration },
}

impl RetryPolicy {
    pub fn max_attempts(&self) -> u32 {
        match self {
            RetryPolicy::None => 1,
            RetryPolicy::Bounded { max_attempts, .. } => (*max_attempts).max(1),
        }
    }

    /// Delay before the attempt following `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self {
            RetryPolicy::None => Duration::ZERO,
            RetryPolicy::Bounded { backoff, .. } => {
                let factor = 1u32 << attempt.saturating_sub(1).min(16);
                backoff.saturating_mul(factor)
            }
        }
    }
}

/// Signed gateway client
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
    access_key: Option<String>,
    secret_key: Option<String>,
    timeout: Option<Duration>,
    retry_policy: RetryPolicy,
    stream_mode: StreamMode,
}

impl GatewayClient {
    /// Create a new gateway client
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.gateway_url.trim_end_matches('/').to_string(),
            access_key: config.gateway_access_key.clone(),
            secret_key: config.gateway_secret_key.clone(),
            timeout: config.gateway_timeout(),
            retry_policy: config.gateway_retry_policy(),
            stream_mode: config.gateway_stream_mode,
        }
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the retry policy
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Override how streamed responses are read
    pub fn with_stream_mode(mut self, stream_mode: StreamMode) -> Self {
        self.stream_mode = stream_mode;
        self
    }

    /// Check if both credentials are configured
    pub fn is_configured(&self) -> bool {
        self.signer().is_ok()
    }

    /// Build a signer from the configured credentials
    pub fn signer(&self) -> Result<RequestSigner, SigningError> {
        Credentials::from_options(self.access_key.as_deref(), self.secret_key.as_deref())
            .map(RequestSigner::new)
    }

    /// Send an envelope to the shared gateway route and return the raw body
    pub async fn send(&self, envelope: &Envelope) -> Result<String, DispatchError> {
        self.dispatch(GATEWAY_PATH, envelope).await
    }

    /// Send a dialogue envelope and extract the turn from the response
    pub async fn send_dialogue(&self, envelope: &Envelope) -> Result<DialogueTurn, DispatchError> {
        let body = self.send(envelope).await?;
        DialogueTurn::from_response_body(&body)
    }

    /// Sign and send an envelope to `path`
    ///
    /// Returns the response text, or for streamed envelopes the lines
    /// selected by the stream mode. Credentials are checked before any
    /// network activity.
    #[instrument(skip(self, envelope), fields(model = %envelope.model, stream = envelope.stream))]
    pub async fn dispatch(&self, path: &str, envelope: &Envelope) -> Result<String, DispatchError> {
        let signer = self.signer()?;

        let ctx = GatewayCallContext::new(path, &envelope.model)
            .with_streaming(envelope.stream)
            .with_session(&envelope.session_id);
        ctx.log_call_start();

        let max_attempts = self.retry_policy.max_attempts();
        let mut attempt = 1;
        let result = loop {
            match self.attempt(&signer, path, envelope, &ctx, attempt).await {
                Ok(body) => break Ok(body),
                Err(e) if attempt < max_attempts && e.is_retryable() => {
                    let delay = self.retry_policy.delay_for(attempt);
                    ctx.log_retry(attempt, delay.as_millis(), &e.to_string());
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => break Err(e),
            }
        };

        match &result {
            Ok(body) => {
                debug!(trace_id = %ctx.trace_id, body_len = body.len(), "Gateway call completed");
                record_gateway_call(&envelope.model, "success", ctx.elapsed_secs());
            }
            Err(e) => {
                ctx.log_error(&e.to_string());
                record_gateway_call(&envelope.model, "error", ctx.elapsed_secs());
            }
        }

        result
    }

    async fn attempt(
        &self,
        signer: &RequestSigner,
        path: &str,
        envelope: &Envelope,
        ctx: &GatewayCallContext,
        attempt: u32,
    ) -> Result<String, DispatchError> {
        // Re-signed per attempt so the timestamp stays inside its window
        let signed = signer.sign(path, envelope).map_err(DispatchError::Encode)?;
        ctx.log_signed(attempt, &signed.content_md5, signed.body.len());

        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTH_HEADER, signed.authorization)
            .body(signed.body);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;

        let status = response.status();
        ctx.log_upstream_response(status.as_u16());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Status { status, body });
        }

        if envelope.stream {
            self.read_stream(response).await
        } else {
            Ok(response.text().await?)
        }
    }

    async fn read_stream(&self, response: reqwest::Response) -> Result<String, DispatchError> {
        let mut buffer = LineBuffer::new();
        let mut lines = Vec::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            for line in buffer.feed(&chunk?) {
                if self.stream_mode == StreamMode::FirstLine {
                    return Ok(line);
                }
                lines.push(line);
            }
        }

        if let Some(line) = buffer.finish() {
            if self.stream_mode == StreamMode::FirstLine {
                return Ok(line);
            }
            lines.push(line);
        }

        if lines.is_empty() {
            return Err(DispatchError::EmptyStream);
        }
        Ok(lines.join("\n"))
    }
}
