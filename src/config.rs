//! Configuration management for MedAssist
//!
//! Configuration is loaded from environment variables. Credentials are
//! optional at load time and checked on every call that needs them, so a
//! missing key disables one tool instead of the whole process.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::gateway::{RetryPolicy, StreamMode};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Signed gateway host (dialogue, skin diagnosis, drug QA)
    pub gateway_url: String,
    /// Gateway access key (`ak`)
    pub gateway_access_key: Option<String>,
    /// Gateway secret key (`sk`)
    pub gateway_secret_key: Option<String>,
    /// Request timeout for gateway calls; `None` waits indefinitely
    pub gateway_timeout_seconds: Option<u64>,
    /// Total attempts per gateway call (1 = no retry)
    pub gateway_max_attempts: u32,
    /// Base backoff between attempts in milliseconds
    pub gateway_retry_backoff_ms: u64,
    /// How streamed gateway responses are consumed
    pub gateway_stream_mode: StreamMode,

    /// OCR service host
    pub ocr_api_url: String,
    /// OCR client id
    pub ocr_api_key: Option<String>,
    /// OCR client secret
    pub ocr_secret_key: Option<String>,

    /// Map MCP toolset SSE endpoint
    pub map_mcp_url: String,
    /// Map MCP toolset key
    pub map_mcp_key: Option<String>,

    /// Model name advertised in agent definitions
    pub agent_model: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("MEDASSIST_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("MEDASSIST_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid MEDASSIST_PORT")?,

            gateway_url: env::var("GATEWAY_URL")
                .unwrap_or_else(|_| "https://01bot.baidu.com".to_string()),
            gateway_access_key: non_empty_var("ak"),
            gateway_secret_key: non_empty_var("sk"),
            gateway_timeout_seconds: match non_empty_var("GATEWAY_TIMEOUT_SECONDS") {
                Some(v) => Some(v.parse().context("Invalid GATEWAY_TIMEOUT_SECONDS")?),
                None => None,
            },
            gateway_max_attempts: env::var("GATEWAY_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .context("Invalid GATEWAY_MAX_ATTEMPTS")?,
            gateway_retry_backoff_ms: env::var("GATEWAY_RETRY_BACKOFF_MS")
                .unwrap_or_else(|_| "200".to_string())
                .parse()
                .context("Invalid GATEWAY_RETRY_BACKOFF_MS")?,
            gateway_stream_mode: env::var("GATEWAY_STREAM_MODE")
                .unwrap_or_else(|_| "first-line".to_string())
                .parse()
                .context("Invalid GATEWAY_STREAM_MODE")?,

            ocr_api_url: env::var("OCR_API_URL")
                .unwrap_or_else(|_| "https://aip.baidubce.com".to_string()),
            ocr_api_key: non_empty_var("API_KEY"),
            ocr_secret_key: non_empty_var("SECRET_KEY"),

            map_mcp_url: env::var("MAP_MCP_URL")
                .unwrap_or_else(|_| "https://mcp.amap.com/sse".to_string()),
            map_mcp_key: non_empty_var("MAP_MCP_KEY"),

            agent_model: env::var("AGENT_MODEL").unwrap_or_else(|_| "deepseek-chat".to_string()),
        })
    }

    /// Gateway timeout as a `Duration`
    pub fn gateway_timeout(&self) -> Option<Duration> {
        self.gateway_timeout_seconds.map(Duration::from_secs)
    }

    /// Retry policy derived from the attempt/backoff settings
    pub fn gateway_retry_policy(&self) -> RetryPolicy {
        if self.gateway_max_attempts <= 1 {
            RetryPolicy::None
        } else {
            RetryPolicy::Bounded {
                max_attempts: self.gateway_max_attempts,
                backoff: Duration::from_millis(self.gateway_retry_backoff_ms),
            }
        }
    }

    /// Whether both gateway credentials are present
    pub fn gateway_credentials_present(&self) -> bool {
        self.gateway_access_key.is_some() && self.gateway_secret_key.is_some()
    }
}

/// Read an env var, treating empty strings as unset
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
