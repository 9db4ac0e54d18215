// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    CounterVec, HistogramVec, GaugeVec, Opts, Registry, TextEncoder, Encoder,
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
    register_gauge_vec_with_registry,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // REQUEST METRICS
    // ============================================================================

    /// Total number of API requests
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("requests_total", "Total number of API requests"),
        &["endpoint", "status"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // AI PROVIDER METRICS
    // ============================================================================

    /// Provider round outcomes per feature
    pub static ref PROVIDER_OUTCOMES: CounterVec = register_counter_vec_with_registry!(
        Opts::new("provider_outcomes_total", "Outcome of each feature request"),
        &["feature", "outcome"], // outcome: cache_hit, success, failure, timeout, superseded
        REGISTRY
    ).unwrap();

    /// Gemini API calls
    pub static ref GEMINI_API_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("gemini_api_calls_total", "Total Gemini API calls"),
        &["model", "status"],
        REGISTRY
    ).unwrap();

    /// Gemini API call duration
    pub static ref GEMINI_API_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("gemini_api_duration_seconds", "Gemini API call duration")
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["model"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // CACHE METRICS
    // ============================================================================

    /// Memoizer operations
    pub static ref CACHE_OPERATIONS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("cache_operations_total", "Total response cache operations"),
        &["operation"], // operation: hit, miss, store
        REGISTRY
    ).unwrap();

    /// Current memoizer entries (expired ones included)
    pub static ref CACHE_ENTRIES: GaugeVec = register_gauge_vec_with_registry!(
        Opts::new("cache_entries_current", "Current number of response cache entries"),
        &["type"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // SUPERSESSION METRICS
    // ============================================================================

    /// Requests cancelled by a newer submission on the same surface
    pub static ref SUPERSEDED_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("superseded_requests_total", "Requests superseded by a newer submission"),
        &["reason"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // PLACES METRICS
    // ============================================================================

    /// Places API calls
    pub static ref PLACES_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("places_calls_total", "Total places provider calls"),
        &["operation", "status"], // operation: geocode, nearby
        REGISTRY
    ).unwrap();
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        // Touch the collectors so they show up in the gathered output
        REQUESTS_TOTAL.with_label_values(&["/health", "200"]).inc();
        CACHE_OPERATIONS.with_label_values(&["hit"]).inc();
        PROVIDER_OUTCOMES.with_label_values(&["symptoms", "success"]).inc();

        let metrics = gather_metrics();
        assert!(metrics.contains("requests_total"));
        assert!(metrics.contains("cache_operations_total"));
        assert!(metrics.contains("provider_outcomes_total"));
    }
}
