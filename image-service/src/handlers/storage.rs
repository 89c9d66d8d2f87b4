use axum::{extract::State, Json};

use crate::api::{ApiError, StorageInfoResponse, STORAGE_PROVIDER};
use crate::router;

pub const STORAGE_OPERATIONS: &[&str] = &["upload", "download", "list", "delete"];

pub async fn storage_info(
    State(state): State<router::State>,
) -> Result<Json<StorageInfoResponse>, ApiError> {
    if !state.config.s3_access_key_present {
        return Err(ApiError::StorageNotConfigured);
    }

    Ok(Json(StorageInfoResponse {
        configured: true,
        provider: STORAGE_PROVIDER,
        bucket: state.config.bucket().to_owned(),
        region: state.config.s3_region.clone(),
        operations_available: STORAGE_OPERATIONS,
        message: "Using S3 credentials from Kubernetes Secrets",
    }))
}
