//! Data Fetch Route
//!
//! - GET /api/data?count=&startTime= - Batch of synthetic fps, memory and
//!   latency samples spread over `[startTime, now)`

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::{DataQuery, DataResponse};
use crate::api::state::AppState;
use crate::stream::generate_multi_series;

/// GET /api/data
///
/// Never fails on parameters: missing or malformed values fall back to
/// `count = 1000` and `startTime = now - 1h`.
pub async fn fetch_data(
    State(state): State<Arc<AppState>>,
    params: Option<Query<DataQuery>>,
) -> Json<DataResponse> {
    let params = params.map(|Query(q)| q).unwrap_or_default();
    let now = Utc::now().timestamp_millis();
    let count = params.count(state.config.max_count);
    let start = params.start_time(now);

    let series = generate_multi_series(count, start, now);

    tracing::debug!(count, start, "Generated data batch");

    Json(DataResponse {
        fps: series.fps,
        memory: series.memory,
        latency: series.latency,
        timestamp: now,
    })
}
