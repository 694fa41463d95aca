//! Metrics Routes
//!
//! Endpoints over the rendering performance log.
//!
//! - GET /api/metrics/stats - Summary statistics (`null` when empty)
//! - GET /api/metrics/export - Download the log as JSON
//! - POST /api/metrics - Record a sample
//! - DELETE /api/metrics - Clear the log

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::{ClearResponse, RecordResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::metrics::{export_file_name, MetricsSample, PerformanceReport};

/// GET /api/metrics/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<Option<PerformanceReport>> {
    Json(state.metrics.stats())
}

/// GET /api/metrics/export
///
/// Responds with the pretty-printed log as an attachment named
/// `performance-metrics-<epoch-millis>.json`. When an export directory is
/// configured the same file is written there as well.
pub async fn export_metrics(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let body = state.metrics.export()?;
    let filename = export_file_name(Utc::now().timestamp_millis());

    if let Some(dir) = state.export_dir.as_deref() {
        let dir = std::path::PathBuf::from(dir);
        let collector = state.metrics.clone();
        tokio::task::spawn_blocking(move || collector.export_to_dir(dir))
            .await
            .map_err(|e| ApiError::Internal(format!("Export task failed: {}", e)))??;
    }

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}

/// POST /api/metrics
pub async fn record_sample(
    State(state): State<Arc<AppState>>,
    Json(sample): Json<MetricsSample>,
) -> ApiResult<(StatusCode, Json<RecordResponse>)> {
    if !sample.fps.is_finite() || !sample.frame_time_ms.is_finite() {
        return Err(ApiError::Validation(
            "fps and frameTimeMs must be finite".to_string(),
        ));
    }

    state.metrics.record(sample);

    Ok((
        StatusCode::CREATED,
        Json(RecordResponse {
            status: "ok".to_string(),
            sample_count: state.metrics.len(),
        }),
    ))
}

/// DELETE /api/metrics
pub async fn clear_metrics(State(state): State<Arc<AppState>>) -> Json<ClearResponse> {
    let cleared = state.metrics.len();
    state.metrics.clear();

    tracing::info!(cleared, "Cleared performance metrics");

    Json(ClearResponse {
        status: "ok".to_string(),
        cleared,
    })
}
