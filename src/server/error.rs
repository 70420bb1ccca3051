// src/server/error.rs
// =============================================================================
// Errors a request handler can answer with.
//
// What reaches the caller:
// - Malformed input (bad JSON, wrong shape) -> 400
// - A report that couldn't be rendered -> 500
// - A store with no request ids left -> 500
// Probe and persistence failures are absorbed further down.
// =============================================================================

use crate::report::RenderError;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

#[derive(Debug)]
pub enum ApiError {
    MalformedInput(serde_json::Error),
    Render(RenderError),
    Store(StoreError),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::MalformedInput(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        ApiError::Render(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MalformedInput(err) => {
                warn!(error = %err, "rejected malformed request");
                (StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", err))
            }
            ApiError::Render(err) => {
                error!(error = %err, "report rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::Store(err) => {
                error!(error = %err, "could not store request");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        let body = Json(serde_json::json!({ "error": message }));
        (status, body).into_response()
    }
}
