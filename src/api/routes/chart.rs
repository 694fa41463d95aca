//! Chart Route
//!
//! - GET /api/chart?series=&kind=&width=&height=&period=&minValue=&maxValue=&category=
//!   - SVG rendering of a live stream buffer
//!
//! `minValue`, `maxValue` and `category` filter the buffer before bucketing.
//!
//! With `period` set, the buffer is bucketed by the aggregation worker and
//! the bucket averages are plotted. If the worker fails the raw samples
//! are plotted instead.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::aggregate::AggregationPeriod;
use crate::api::dto::ChartQuery;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::render::{render_svg, ChartKind};
use crate::stream::Sample;

/// Largest width or height accepted for a rendered chart
pub const MAX_DIMENSION: f64 = 4096.0;

/// GET /api/chart
pub async fn render_chart(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChartQuery>,
) -> ApiResult<Response> {
    let stream = state.streams.by_name(params.series_name())?;

    let kind = match params.kind.as_deref() {
        None => ChartKind::default(),
        Some(name) => ChartKind::parse(name)
            .ok_or_else(|| ApiError::Validation(format!("Unknown chart kind: {}", name)))?,
    };

    let period = params
        .period
        .as_deref()
        .map(|label| {
            AggregationPeriod::from_label(label)
                .ok_or_else(|| ApiError::Validation(format!("Unknown period: {}", label)))
        })
        .transpose()?;

    let width = params.width(state.render.width).min(MAX_DIMENSION);
    let height = params.height(state.render.height).min(MAX_DIMENSION);

    let filter = params.filter();
    let raw = filter.apply(stream.snapshot().await);
    let samples = match period {
        Some(period) => bucket_averages(&state, raw, period).await,
        None => raw,
    };

    let svg = render_svg(kind, &samples, width, height);

    tracing::debug!(
        series = %stream.series(),
        kind = kind.as_str(),
        points = samples.len(),
        "Rendered chart"
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "image/svg+xml")],
        svg,
    )
        .into_response())
}

/// Bucket averages as plottable samples, or `raw` if the worker fails
async fn bucket_averages(state: &AppState, raw: Vec<Sample>, period: AggregationPeriod) -> Vec<Sample> {
    match state.worker.aggregate(&raw, period).await {
        Ok(buckets) => buckets
            .iter()
            .map(|b| Sample::new(b.start_time, b.avg))
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, period = %period, "Aggregation failed, plotting raw samples");
            raw
        }
    }
}
