//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Errors an API handler can answer with.
#[derive(Debug)]
pub enum ApiError {
    /// The request body was missing, not JSON, or the wrong shape.
    InvalidBody(serde_json::Error),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidBody(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InvalidBody(err) => {
                tracing::debug!(error = %err, "rejected request body");
                (
                    StatusCode::BAD_REQUEST,
                    format!("invalid request body: {err}"),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
