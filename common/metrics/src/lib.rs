use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::Next,
    response::IntoResponse,
};
use metrics::{Counter, Histogram, Key, Label, Level, Metadata, Recorder};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use thiserror::Error;

/// Same buckets as the reference prometheus clients, in seconds.
pub const DEFAULT_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

/// `path` label used by `track_metrics` for requests no route matched.
pub const UNMATCHED_PATH: &str = "unmatched";

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("failed to build prometheus recorder: {0}")]
    Build(#[from] BuildError),
}

/// A prometheus registry that is owned by whoever builds it, instead of being
/// installed as the process-global `metrics` recorder.
///
/// Installing a global recorder when a service is used as a library (during tests etc)
/// does not work well: the second install fails and every router shares the same counters.
/// Handles returned by `counter` and `histogram` are atomic and can be cloned across tasks.
#[derive(Clone)]
pub struct MetricsRegistry {
    recorder: Arc<PrometheusRecorder>,
    handle: PrometheusHandle,
}

impl MetricsRegistry {
    pub fn new(buckets: &[f64]) -> Result<Self, MetricsError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets(buckets)?
            .build_recorder();
        let handle = recorder.handle();

        Ok(Self {
            recorder: Arc::new(recorder),
            handle,
        })
    }

    pub fn describe_counter(&self, name: &'static str, description: &'static str) {
        self.recorder
            .describe_counter(name.into(), None, description.into());
    }

    pub fn describe_histogram(&self, name: &'static str, description: &'static str) {
        self.recorder
            .describe_histogram(name.into(), None, description.into());
    }

    pub fn counter(&self, name: &'static str, labels: &[(String, String)]) -> Counter {
        self.recorder
            .register_counter(&metric_key(name, labels), &metadata())
    }

    pub fn histogram(&self, name: &'static str, labels: &[(String, String)]) -> Histogram {
        self.recorder
            .register_histogram(&metric_key(name, labels), &metadata())
    }

    // Shorthand for the common "bump by one" case
    pub fn inc(&self, name: &'static str, labels: &[(String, String)]) {
        self.counter(name, labels).increment(1);
    }

    /// Start timing; the elapsed seconds are recorded into `name` when the guard is dropped.
    pub fn timing_guard(&self, name: &'static str, labels: &[(String, String)]) -> TimingGuard<'_> {
        TimingGuard {
            registry: self,
            name,
            labels: labels.to_vec(),
            start: Instant::now(),
        }
    }

    /// Prometheus text exposition of everything registered so far.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

fn metric_key(name: &'static str, labels: &[(String, String)]) -> Key {
    let labels: Vec<Label> = labels
        .iter()
        .map(|(key, value)| Label::new(key.clone(), value.clone()))
        .collect();
    Key::from_parts(name, labels)
}

fn metadata() -> Metadata<'static> {
    Metadata::new(module_path!(), Level::INFO, Some(module_path!()))
}

// A guard to record the time between creation and drop as a histogram entry
pub struct TimingGuard<'a> {
    registry: &'a MetricsRegistry,
    name: &'static str,
    labels: Vec<(String, String)>,
    start: Instant,
}

impl TimingGuard<'_> {
    // Consumes the guard, so `guard.label(..)` without re-binding reports immediately.
    pub fn label(mut self, key: &str, value: &str) -> Self {
        self.labels.push((key.to_owned(), value.to_owned()));
        self
    }

    // Makes the end of the timed block explicit at the call site.
    pub fn fin(self) {}
}

impl Drop for TimingGuard<'_> {
    fn drop(&mut self) {
        self.registry
            .histogram(self.name, &self.labels)
            .record(self.start.elapsed().as_secs_f64());
    }
}

/// Middleware to record some common HTTP metrics
/// Someday tower-http might provide a metrics middleware: https://github.com/tower-rs/tower-http/issues/57
pub async fn track_metrics(
    State(registry): State<MetricsRegistry>,
    req: Request<Body>,
    next: Next,
) -> impl IntoResponse {
    let start = Instant::now();

    // Raw paths of unmatched requests would make the label set unbounded.
    let path = if let Some(matched_path) = req.extensions().get::<MatchedPath>() {
        matched_path.as_str().to_owned()
    } else {
        UNMATCHED_PATH.to_owned()
    };

    let method = req.method().clone();

    // Run the rest of the request handling first, so we can measure it and get response
    // codes.
    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    let labels = [
        ("method".to_owned(), method.to_string()),
        ("path".to_owned(), path),
        ("status".to_owned(), status),
    ];

    registry.inc("http_requests_total", &labels);
    registry
        .histogram("http_requests_duration_seconds", &labels)
        .record(latency);

    response
}
