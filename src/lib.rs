//! MedAssist - medical-assistance agent tools
//!
//! This library provides the signed gateway client behind the AI doctor,
//! skin diagnosis and drug QA services, the agent tools built on it, and
//! an HTTP tool server exposing them to an agent host.

pub mod agents;
pub mod config;
pub mod error;
pub mod gateway;
pub mod routes;
pub mod signing;
pub mod streaming;
pub mod tools;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::agents::AgentSpec;
pub use crate::config::Config;
pub use crate::gateway::GatewayClient;
pub use crate::signing::{Credentials, RequestSigner};
pub use crate::tools::{OcrClient, ToolRegistry};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    pub gateway: Arc<GatewayClient>,
    pub ocr: Arc<OcrClient>,
    pub tools: Arc<ToolRegistry>,
    /// Agent tree advertised to hosts
    pub agents: AgentSpec,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // No client-wide timeout: gateway timeouts are per request and opt-in
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .build()?;

        Ok(Self::with_http_client(config, http_client))
    }

    /// Create application state around an existing HTTP client
    pub fn with_http_client(config: Config, http_client: reqwest::Client) -> Self {
        let gateway = Arc::new(GatewayClient::new(http_client.clone(), &config));
        let ocr = Arc::new(OcrClient::new(http_client, &config));
        let tools = Arc::new(ToolRegistry::new(gateway.clone(), ocr.clone()));
        let agents = agents::root_agent(&config);

        Self {
            config,
            start_time: Instant::now(),
            gateway,
            ocr,
            tools,
            agents,
        }
    }
}
