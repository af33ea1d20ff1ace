//! Prometheus metrics registry and instruments.

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Client Metrics
    pub static ref CLIENT_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("resortdesk_client_requests_total", "Total number of requests sent to the server"),
        &["endpoint", "status"]
    ).expect("metric can be created");
    pub static ref CLIENT_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "resortdesk_client_request_duration_seconds",
            "Server request duration in seconds"
        ).buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["endpoint"]
    ).expect("metric can be created");

    // Store Metrics
    pub static ref FOLLOW_REQUESTS_PENDING: IntGauge = IntGauge::new(
        "resortdesk_follow_requests_pending",
        "Number of follow requests currently held by the store"
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("resortdesk_errors_total", "Total number of errors"),
        &["error_type", "operation"]
    ).expect("metric can be created");
}

/// Initialize metrics registry.
///
/// Instruments that are already registered are left as they are.
pub fn init_metrics() {
    register(Box::new(CLIENT_REQUESTS_TOTAL.clone()), "CLIENT_REQUESTS_TOTAL");
    register(
        Box::new(CLIENT_REQUEST_DURATION_SECONDS.clone()),
        "CLIENT_REQUEST_DURATION_SECONDS",
    );
    register(
        Box::new(FOLLOW_REQUESTS_PENDING.clone()),
        "FOLLOW_REQUESTS_PENDING",
    );
    register(Box::new(ERRORS_TOTAL.clone()), "ERRORS_TOTAL");

    tracing::info!("Metrics registry initialized");
}

fn register(collector: Box<dyn prometheus::core::Collector>, name: &str) {
    match REGISTRY.register(collector) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
        Err(error) => panic!("{name} can be registered: {error}"),
    }
}

/// Render all registered metrics in the Prometheus text format.
pub fn render() -> String {
    use prometheus::TextEncoder;

    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    match encoder.encode_to_string(&metric_families) {
        Ok(metrics_text) => metrics_text,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            String::new()
        }
    }
}
