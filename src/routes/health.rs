//! Health check endpoints
//!
//! - `/health` - Full health check with backend configuration status
//! - `/health/ready` - Readiness probe (gateway credentials present)
//! - `/health/live` - Liveness probe

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

/// Health status enum
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Configuration state of one backend
#[derive(Debug, Serialize)]
pub struct BackendCheck {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BackendCheck {
    fn configured(configured: bool, missing: &str) -> Self {
        if configured {
            Self {
                status: HealthStatus::Healthy,
                error: None,
            }
        } else {
            Self {
                status: HealthStatus::Unhealthy,
                error: Some(format!("{} not configured", missing)),
            }
        }
    }
}

/// Backend checks collection
#[derive(Debug, Serialize)]
pub struct BackendChecks {
    pub gateway: BackendCheck,
    pub ocr: BackendCheck,
}

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
    pub checks: BackendChecks,
}

/// Simple health response for liveness/readiness
#[derive(Debug, Serialize)]
pub struct SimpleHealthResponse {
    pub status: HealthStatus,
}

/// Full health check endpoint
///
/// The gateway backs most tools, so missing gateway credentials make the
/// service unhealthy; missing OCR credentials only degrade it.
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let gateway = BackendCheck::configured(state.gateway.is_configured(), "ak/sk");
    let ocr = BackendCheck::configured(state.ocr.is_configured(), "API_KEY/SECRET_KEY");

    let overall_status = if gateway.status == HealthStatus::Unhealthy {
        HealthStatus::Unhealthy
    } else if ocr.status != HealthStatus::Healthy {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    };

    let response = HealthResponse {
        status: overall_status.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        checks: BackendChecks { gateway, ocr },
    };

    let status_code = match overall_status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Readiness probe endpoint
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<SimpleHealthResponse>) {
    if !state.gateway.is_configured() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(SimpleHealthResponse {
                status: HealthStatus::Unhealthy,
            }),
        );
    }

    (
        StatusCode::OK,
        Json(SimpleHealthResponse {
            status: HealthStatus::Healthy,
        }),
    )
}

/// Liveness probe endpoint
pub async fn liveness_check() -> (StatusCode, Json<SimpleHealthResponse>) {
    (
        StatusCode::OK,
        Json(SimpleHealthResponse {
            status: HealthStatus::Healthy,
        }),
    )
}
