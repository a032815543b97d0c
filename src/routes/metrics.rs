//! Prometheus metrics endpoint
//!
//! Exposes application metrics in Prometheus format for monitoring.

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

    // Register custom metrics
    register_metrics();
}

/// Register all custom metrics
fn register_metrics() {
    // These metrics are incremented at their call sites; descriptions live here
    metrics::describe_counter!(
        "manifold_relay_requests_total",
        "Total number of relay requests processed"
    );
    metrics::describe_histogram!(
        "manifold_relay_duration_seconds",
        "Relay request duration in seconds"
    );
    metrics::describe_counter!(
        "manifold_relay_bytes_total",
        "Total bytes relayed, by direction"
    );
    metrics::describe_counter!(
        "manifold_audit_records_total",
        "Total audit records, by outcome"
    );
}

/// Prometheus metrics endpoint handler
///
/// Returns metrics in Prometheus text format for scraping.
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a completed relay request
pub fn record_relay(provider: &str, mode: &str, outcome: &str, duration_secs: f64) {
    metrics::counter!(
        "manifold_relay_requests_total",
        "provider" => provider.to_string(),
        "mode" => mode.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    metrics::histogram!("manifold_relay_duration_seconds", "provider" => provider.to_string())
        .record(duration_secs);
}
