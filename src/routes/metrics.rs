//! Prometheus metrics endpoint
//!
//! Exposes gateway and tool metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

fn register_metrics() {
    metrics::describe_counter!(
        "medassist_gateway_calls_total",
        "Total number of outbound backend calls"
    );
    metrics::describe_histogram!(
        "medassist_gateway_call_duration_seconds",
        "Outbound backend call duration in seconds"
    );
    metrics::describe_counter!(
        "medassist_tool_invocations_total",
        "Total number of tool invocations"
    );
}

/// Prometheus metrics endpoint handler
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record an outbound backend call
pub fn record_gateway_call(model: &str, outcome: &str, duration_secs: f64) {
    metrics::counter!(
        "medassist_gateway_calls_total",
        "model" => model.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    metrics::histogram!("medassist_gateway_call_duration_seconds", "model" => model.to_string())
        .record(duration_secs);
}

/// Record a tool invocation
pub fn record_tool_invocation(tool: &str, outcome: &str) {
    metrics::counter!(
        "medassist_tool_invocations_total",
        "tool" => tool.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}
