use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::api::{ApiError, ProcessRequest, ProcessResult, StorageSummary, STORAGE_PROVIDER};
use crate::prometheus::{processing_timer, report_request};
use crate::router;

pub const OPERATIONS: &[&str] = &["resize", "compress", "optimize"];
pub const DEFAULT_IMAGE: &str = "unknown.jpg";
pub const DEFAULT_USER: &str = "anonymous";

const SIMULATED_LATENCY: Duration = Duration::from_millis(100);

// FIXME: presence check only, the header value is never validated against the service token.
fn has_authorization(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .is_some_and(|value| !value.is_empty())
}

/// Mock image processing. A missing or unparseable body is treated as `{}`.
pub async fn process(
    State(state): State<router::State>,
    headers: HeaderMap,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<ProcessResult>, ApiError> {
    let payload = match payload {
        Ok(Json(payload)) => Some(payload),
        Err(rejection) => {
            debug!("ignoring /process body, using defaults: {}", rejection.body_text());
            None
        }
    };

    process_payload(state, &headers, payload).await
}

async fn process_payload(
    state: router::State,
    headers: &HeaderMap,
    payload: Option<ProcessRequest>,
) -> Result<Json<ProcessResult>, ApiError> {
    if !has_authorization(headers) && state.config.service_token_present {
        warn!("rejecting /process call without authorization header");
        return Err(ApiError::Unauthorized);
    }

    report_request(&state.metrics, "POST", "/process");

    let timer = processing_timer(&state.metrics);

    let payload = payload.unwrap_or_default();
    debug!("received payload: {:?}", payload);

    // Nothing to process for real, only hold the request for a bit.
    tokio::time::sleep(SIMULATED_LATENCY).await;

    let result = ProcessResult {
        processed: true,
        image: payload.image.unwrap_or_else(|| DEFAULT_IMAGE.to_owned()),
        user: payload.user.unwrap_or_else(|| DEFAULT_USER.to_owned()),
        operations: OPERATIONS,
        storage: StorageSummary {
            provider: STORAGE_PROVIDER,
            bucket: state.config.bucket().to_owned(),
            configured: state.config.s3_access_key_present,
        },
        timestamp: OffsetDateTime::now_utc(),
    };

    timer.fin();
    info!(image = %result.image, user = %result.user, "processed image");

    Ok(Json(result))
}
