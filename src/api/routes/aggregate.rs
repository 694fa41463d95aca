//! Aggregation Route
//!
//! - POST /api/aggregate - Forward a worker request message to the
//!   aggregation worker and return its response message
//!
//! The body is passed through untouched, so unknown message types and
//! malformed payloads are answered by the worker with an `ERROR` message.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::aggregate::WorkerResponse;
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// POST /api/aggregate
///
/// `ERROR` responses are returned with 400; a worker timeout is a 503.
pub async fn aggregate(
    State(state): State<Arc<AppState>>,
    body: String,
) -> ApiResult<(StatusCode, Json<WorkerResponse>)> {
    let response = state.worker.handle_raw(body).await?;

    let status = match &response {
        WorkerResponse::Error { error } => {
            tracing::debug!(error = %error, "Aggregation request rejected");
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::OK,
    };

    Ok((status, Json(response)))
}
