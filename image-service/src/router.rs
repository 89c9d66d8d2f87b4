use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{get, post},
    Router,
};
use common_metrics::{track_metrics, MetricsRegistry};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::handlers::{self, probes, process, status, storage};

#[derive(Clone)]
pub struct State {
    pub config: Arc<ServiceConfig>,
    pub metrics: MetricsRegistry,
    pub started_at: Instant,
}

impl State {
    pub fn new(config: ServiceConfig, metrics: MetricsRegistry) -> Self {
        Self {
            config: Arc::new(config),
            metrics,
            started_at: Instant::now(),
        }
    }
}

pub fn router(state: State) -> Router {
    let routes = Router::new()
        .route("/", get(status::index))
        .route("/health", get(probes::health))
        .route("/ready", get(probes::ready))
        .route("/status", get(status::status))
        .route("/process", post(process::process))
        .route("/storage-info", get(storage::storage_info))
        .route("/metrics", get(status::metrics));

    with_layers(routes, state)
}

// Layers apply to the fallback too. The panic catcher sits innermost so that
// tracing and http metrics still see the 500 it produces.
fn with_layers(routes: Router<State>, state: State) -> Router {
    routes
        .fallback(handlers::not_found)
        .layer(CatchPanicLayer::custom(handlers::internal_error))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(
            state.metrics.clone(),
            track_metrics,
        ))
        .with_state(state)
}
