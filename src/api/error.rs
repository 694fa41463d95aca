//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::aggregate::AggregateError;
use crate::metrics::MetricsError;
use crate::stream::StreamError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Live stream lookup or control failed
    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    /// Aggregation worker error
    #[error("Aggregation error: {0}")]
    Aggregate(#[from] AggregateError),

    /// Metrics export failed
    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    #[error("Internal error: {0}")]
    Internal(String),

    /// Service unavailable (dependency down)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    /// HTTP status and machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Stream(StreamError::UnknownSeries(_)) => {
                (StatusCode::NOT_FOUND, "UNKNOWN_SERIES")
            }
            ApiError::Stream(StreamError::AlreadyRunning(_)) => {
                (StatusCode::CONFLICT, "STREAM_RUNNING")
            }
            ApiError::Aggregate(e) => match e {
                AggregateError::Worker(_) => (StatusCode::BAD_REQUEST, "AGGREGATION_ERROR"),
                AggregateError::Timeout(_) => (StatusCode::SERVICE_UNAVAILABLE, "WORKER_TIMEOUT"),
                AggregateError::Closed => (StatusCode::SERVICE_UNAVAILABLE, "WORKER_UNAVAILABLE"),
                AggregateError::Spawn(_) => (StatusCode::INTERNAL_SERVER_ERROR, "WORKER_ERROR"),
            },
            ApiError::Metrics(_) => (StatusCode::INTERNAL_SERVER_ERROR, "METRICS_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "API error occurred"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::SeriesKind;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                ApiError::Stream(StreamError::UnknownSeries("cpu".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Stream(StreamError::AlreadyRunning(SeriesKind::Fps)),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::Aggregate(AggregateError::Worker("bad".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Aggregate(AggregateError::Timeout(5000)),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.status_and_code().0, status, "{}", error);
        }
    }

    #[test]
    fn test_response_status() {
        let response = ApiError::NotFound("nothing".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
