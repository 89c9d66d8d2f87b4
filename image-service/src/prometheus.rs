use common_metrics::{MetricsError, MetricsRegistry, TimingGuard, DEFAULT_BUCKETS};

pub const REQUESTS_TOTAL: &str = "image_requests_total";
pub const PROCESSING_DURATION: &str = "image_processing_duration_seconds";

pub fn setup_metrics_registry() -> Result<MetricsRegistry, MetricsError> {
    let registry = MetricsRegistry::new(DEFAULT_BUCKETS)?;

    registry.describe_counter(REQUESTS_TOTAL, "Total image processing requests");
    registry.describe_histogram(PROCESSING_DURATION, "Time to process images");

    Ok(registry)
}

/// Counts one request, keyed by (method, endpoint).
pub fn report_request(registry: &MetricsRegistry, method: &str, endpoint: &str) {
    let labels = [
        ("method".to_owned(), method.to_owned()),
        ("endpoint".to_owned(), endpoint.to_owned()),
    ];
    registry.inc(REQUESTS_TOTAL, &labels);
}

pub fn processing_timer(registry: &MetricsRegistry) -> TimingGuard<'_> {
    registry.timing_guard(PROCESSING_DURATION, &[])
}
