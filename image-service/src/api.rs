use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

pub const SERVICE_NAME: &str = "image-service";
pub const STORAGE_PROVIDER: &str = "S3-compatible";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Storage not configured")]
    StorageNotConfigured,
    #[error("Endpoint not found")]
    NotFound,
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::StorageNotConfigured | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn hint(&self) -> Option<&'static str> {
        match self {
            ApiError::StorageNotConfigured => Some("S3 credentials missing from Kubernetes Secrets"),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            hint: self.hint().map(str::to_owned),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: String,
    /// Seconds since the service state was built.
    pub uptime: f64,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub operational: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub processed_images: u64,
    pub using_secrets: bool,
}

/// The body of a request made to `/process`. Both fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct ProcessRequest {
    pub image: Option<String>,
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StorageSummary {
    pub provider: &'static str,
    pub bucket: String,
    pub configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ProcessResult {
    pub processed: bool,
    pub image: String,
    pub user: String,
    pub operations: &'static [&'static str],
    pub storage: StorageSummary,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct StorageInfoResponse {
    pub configured: bool,
    pub provider: &'static str,
    pub bucket: String,
    pub region: String,
    pub operations_available: &'static [&'static str],
    pub message: &'static str,
}
