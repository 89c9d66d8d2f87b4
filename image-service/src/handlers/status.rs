use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use time::OffsetDateTime;

use crate::api::{IndexResponse, StatusResponse, SERVICE_NAME};
use crate::prometheus::report_request;
use crate::router;

pub const ENDPOINTS: &[&str] = &[
    "/health",
    "/ready",
    "/status",
    "/process",
    "/storage-info",
    "/metrics",
];

// Placeholder figure, not tied to any counter.
pub const PROCESSED_IMAGES: u64 = 42;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        service: SERVICE_NAME,
        version: "1.0.0",
        endpoints: ENDPOINTS,
    })
}

pub async fn status(State(state): State<router::State>) -> Json<StatusResponse> {
    report_request(&state.metrics, "GET", "/status");

    Json(StatusResponse {
        operational: true,
        timestamp: OffsetDateTime::now_utc(),
        processed_images: PROCESSED_IMAGES,
        using_secrets: state.config.has_required_secrets(),
    })
}

pub async fn metrics(State(state): State<router::State>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_utils::state_with_env;

    #[tokio::test]
    async fn index_lists_endpoints() {
        let Json(body) = index().await;

        assert_eq!(body.service, "image-service");
        assert_eq!(body.version, "1.0.0");
        assert_eq!(body.endpoints.len(), 6);
        assert!(body.endpoints.contains(&"/storage-info"));
    }

    #[tokio::test]
    async fn status_is_static_and_counted() {
        let state = state_with_env(&[("IMAGE_SERVICE_TOKEN", "t"), ("S3_ACCESS_KEY", "k")]);

        let Json(first) = status(State(state.clone())).await;
        let Json(second) = status(State(state.clone())).await;

        assert!(first.operational);
        assert!(first.using_secrets);
        assert_eq!(first.processed_images, 42);
        assert_eq!(second.processed_images, 42);
        assert_eq!(first.timestamp.offset(), time::UtcOffset::UTC);

        let rendered = state.metrics.render();
        let line = rendered
            .lines()
            .find(|line| {
                line.starts_with("image_requests_total{")
                    && line.contains("method=\"GET\"")
                    && line.contains("endpoint=\"/status\"")
            })
            .unwrap();
        assert!(line.ends_with(" 2"));
    }

    #[tokio::test]
    async fn status_without_secrets() {
        let state = state_with_env(&[("IMAGE_SERVICE_TOKEN", "t")]);

        let Json(body) = status(State(state)).await;

        assert!(body.operational);
        assert!(!body.using_secrets);
    }
}
