//! Error taxonomy for the HTTP surface.
//!
//! Every error renders as `{"error": "<message>"}`. Store failures are
//! logged with detail but answer with a generic message so internals never
//! leak to clients.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use bunny_care_store::{NormalizeError, RangeParseError, StoreError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid id format")]
    InvalidId,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<NormalizeError> for ApiError {
    fn from(err: NormalizeError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<RangeParseError> for ApiError {
    fn from(err: RangeParseError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidId => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.to_string()),
            ApiError::Store(err) => {
                error!("store operation failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
