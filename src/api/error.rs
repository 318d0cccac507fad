//! Error types for the HTTP boundary

use crate::core::error::SimError;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;
use thiserror::Error;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// Failures surfaced to HTTP clients
#[derive(Error, Debug)]
pub enum ApiError {
    /// Body is not valid JSON or does not have the expected shape
    #[error("Malformed request: {0}")]
    BadRequest(String),

    /// Well-formed input the simulator refuses
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] SimError),

    #[error("Request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("No such resource: {0}")]
    NotFound(String),

    #[error("Method {method} not allowed for {path}")]
    MethodNotAllowed { method: String, path: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render as a JSON error document: `{"error": "..."}`
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let status = self.status();
        super::json_response(
            status,
            &ErrorBody {
                error: self.to_string(),
            },
        )
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
