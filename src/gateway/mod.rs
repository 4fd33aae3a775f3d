//! Health gateway integration
//!
//! Envelope models, the signed dispatcher and per-call logging for the
//! gateway that fronts the dialogue, skin diagnosis and drug QA services.

pub mod client;
pub mod logging;
pub mod models;

pub use client::{DispatchError, GatewayClient, RetryPolicy, StreamMode, GATEWAY_PATH};
pub use models::*;
