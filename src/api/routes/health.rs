//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (worker answers requests)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::aggregate::AggregationPeriod;
use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 once the aggregation worker answers a request.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match check_worker_health(&state).await {
        true => StatusCode::OK,
        false => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let worker_ok = check_worker_health(&state).await;
    let streams_running = state.streams.iter().filter(|s| s.is_running()).count();

    Json(HealthResponse {
        status: if worker_ok { "healthy" } else { "degraded" }.to_string(),
        streams_running,
        worker: if worker_ok { "ok" } else { "error" }.to_string(),
        ws_connections: state.ws_connection_count().await,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// An empty aggregation round-trips through the worker thread
async fn check_worker_health(state: &AppState) -> bool {
    match state.worker.aggregate(&[], AggregationPeriod::default()).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Aggregation worker health check failed");
            false
        }
    }
}
