use std::any::Any;

use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::api::ApiError;

pub mod probes;
pub mod process;
pub mod status;
pub mod storage;

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Turns a handler panic into the JSON 500 body, used by `CatchPanicLayer`.
pub fn internal_error(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic message"
    };
    error!("handler panicked: {}", details);

    ApiError::Internal.into_response()
}
