// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    REQUESTS_TOTAL,
    PROVIDER_OUTCOMES,
    GEMINI_API_CALLS,
    GEMINI_API_DURATION,
    CACHE_OPERATIONS,
    CACHE_ENTRIES,
    SUPERSEDED_TOTAL,
    PLACES_CALLS,
};

/// Helper to record request metrics
pub fn record_request(endpoint: &str, status_code: u16) {
    REQUESTS_TOTAL
        .with_label_values(&[endpoint, &status_code.to_string()])
        .inc();
}

/// Helper to record the outcome of a feature request
pub fn record_provider_outcome(feature: &str, outcome: &str) {
    PROVIDER_OUTCOMES.with_label_values(&[feature, outcome]).inc();
}

/// Helper to record Gemini API call metrics
pub fn record_gemini_call(model: &str, success: bool, duration_secs: f64) {
    let status = if success { "success" } else { "failure" };
    GEMINI_API_CALLS.with_label_values(&[model, status]).inc();
    GEMINI_API_DURATION
        .with_label_values(&[model])
        .observe(duration_secs);
}

/// Helpers to record response cache operations
pub fn record_cache_hit() {
    CACHE_OPERATIONS.with_label_values(&["hit"]).inc();
}

pub fn record_cache_miss() {
    CACHE_OPERATIONS.with_label_values(&["miss"]).inc();
}

pub fn record_cache_store() {
    CACHE_OPERATIONS.with_label_values(&["store"]).inc();
}

pub fn update_cache_entries(count: usize) {
    CACHE_ENTRIES.with_label_values(&["stored"]).set(count as f64);
}

pub fn record_superseded() {
    SUPERSEDED_TOTAL.with_label_values(&["resubmit"]).inc();
}

pub fn record_places_call(operation: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    PLACES_CALLS.with_label_values(&[operation, status]).inc();
}
