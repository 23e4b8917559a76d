//! Metrics collection and Prometheus export.
//!
//! Installs the global recorder and renders it for the /metrics endpoint.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Later calls are no-ops.
pub fn init_metrics() -> Result<(), BuildError> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = METRICS_HANDLE.set(handle);
    Ok(())
}

/// Current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

/// Count one outbound provider call and its latency.
pub fn record_upstream(provider: &'static str, outcome: &'static str, elapsed: Duration) {
    counter!("upstream_requests_total", "provider" => provider, "outcome" => outcome)
        .increment(1);
    histogram!("upstream_request_duration_seconds", "provider" => provider)
        .record(elapsed.as_secs_f64());
}

/// Count tokens reported by the model for one call.
pub fn record_tokens(model: &str, input_tokens: i32, output_tokens: i32) {
    counter!("gemini_tokens_total", "model" => model.to_string(), "direction" => "input")
        .increment(input_tokens.max(0) as u64);
    counter!("gemini_tokens_total", "model" => model.to_string(), "direction" => "output")
        .increment(output_tokens.max(0) as u64);
}
