use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use crate::api::{HealthResponse, ReadyResponse, SERVICE_NAME};
use crate::router;

/// Liveness: always healthy while the process answers.
pub async fn health(State(state): State<router::State>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: state.config.version.clone(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

/// Readiness only depends on configuration, there is no async loop to check.
pub async fn ready(State(state): State<router::State>) -> (StatusCode, Json<ReadyResponse>) {
    if state.config.has_required_secrets() {
        (
            StatusCode::OK,
            Json(ReadyResponse {
                ready: true,
                message: "Service ready",
            }),
        )
    } else {
        warn!(
            service_token = state.config.service_token_present,
            s3_credentials = state.config.s3_access_key_present,
            "readiness check failed"
        );
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyResponse {
                ready: false,
                message: "Missing configuration",
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_utils::state_with_env;

    #[tokio::test]
    async fn health_reports_version_and_uptime() {
        let state = state_with_env(&[("VERSION", "9.9.9")]);

        let Json(first) = health(State(state.clone())).await;
        let Json(second) = health(State(state)).await;

        assert_eq!(first.status, "healthy");
        assert_eq!(first.service, "image-service");
        assert_eq!(first.version, "9.9.9");
        assert!(first.uptime >= 0.0);
        assert!(second.uptime >= first.uptime);
    }

    #[tokio::test]
    async fn ready_needs_token_and_s3_key() {
        let cases = [
            (vec![], false),
            (vec![("IMAGE_SERVICE_TOKEN", "t")], false),
            (vec![("S3_ACCESS_KEY", "k")], false),
            (vec![("S3_ACCESS_KEY", "k"), ("S3_BUCKET", "b")], false),
            (vec![("IMAGE_SERVICE_TOKEN", "t"), ("S3_ACCESS_KEY", "k")], true),
        ];

        for (vars, expected) in cases {
            let (status, Json(body)) = ready(State(state_with_env(&vars))).await;
            assert_eq!(body.ready, expected, "{:?}", vars);
            if expected {
                assert_eq!(status, StatusCode::OK);
                assert_eq!(body.message, "Service ready");
            } else {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body.message, "Missing configuration");
            }
        }
    }
}
