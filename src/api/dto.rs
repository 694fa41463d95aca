//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! Query strings are taken as raw strings and parsed leniently so a bad
//! parameter falls back to its default instead of rejecting the request.

use serde::{Deserialize, Serialize};

use crate::stream::{Sample, SampleFilter, SeriesKind};

// ============================================
// DATA FETCH DTOs
// ============================================

/// Default number of samples per series
pub const DEFAULT_COUNT: usize = 1000;

/// Default look-back window: one hour
pub const DEFAULT_LOOKBACK_MS: i64 = 3_600_000;

/// Query string for `GET /api/data`
#[derive(Debug, Default, Deserialize)]
pub struct DataQuery {
    #[serde(default)]
    pub count: Option<String>,
    #[serde(default, rename = "startTime")]
    pub start_time: Option<String>,
}

impl DataQuery {
    /// Requested count, falling back to the default and capped at `max_count`
    pub fn count(&self, max_count: usize) -> usize {
        self.count
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_COUNT)
            .min(max_count)
    }

    /// Requested start time, falling back to one hour before `now`
    pub fn start_time(&self, now: i64) -> i64 {
        self.start_time
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .unwrap_or_else(|| now.saturating_sub(DEFAULT_LOOKBACK_MS))
    }
}

/// Response for `GET /api/data`
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse {
    pub fps: Vec<Sample>,
    pub memory: Vec<Sample>,
    pub latency: Vec<Sample>,
    /// Generation time, epoch millis
    pub timestamp: i64,
}

// ============================================
// CHART DTOs
// ============================================

/// Query string for `GET /api/chart`
#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    /// Optional aggregation period; when set the chart plots bucket averages
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default, rename = "minValue")]
    pub min_value: Option<String>,
    #[serde(default, rename = "maxValue")]
    pub max_value: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl ChartQuery {
    /// Named series, defaulting to fps when absent
    pub fn series_name(&self) -> &str {
        self.series.as_deref().unwrap_or(SeriesKind::Fps.as_str())
    }

    pub fn width(&self, default: f64) -> f64 {
        parse_dimension(self.width.as_deref()).unwrap_or(default)
    }

    pub fn height(&self, default: f64) -> f64 {
        parse_dimension(self.height.as_deref()).unwrap_or(default)
    }

    /// Value and category filter; unparseable bounds are ignored
    pub fn filter(&self) -> SampleFilter {
        SampleFilter {
            min_value: parse_bound(self.min_value.as_deref()),
            max_value: parse_bound(self.max_value.as_deref()),
            category: self
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from),
        }
    }
}

/// Finite number, otherwise `None`
fn parse_bound(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|r| r.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Positive finite number, otherwise `None`
fn parse_dimension(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|r| r.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded
    pub status: String,
    /// Number of live streams currently ticking
    pub streams_running: usize,
    /// Aggregation worker status: ok, error
    pub worker: String,
    /// Open WebSocket connections
    pub ws_connections: usize,
    pub uptime_seconds: u64,
    pub version: String,
}

// ============================================
// METRICS DTOs
// ============================================

/// Response for `POST /api/metrics`
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub status: String,
    /// Samples in the log after recording
    pub sample_count: usize,
}

/// Response for `DELETE /api/metrics`
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub status: String,
    /// Samples removed
    pub cleared: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(count: Option<&str>, start: Option<&str>) -> DataQuery {
        DataQuery {
            count: count.map(String::from),
            start_time: start.map(String::from),
        }
    }

    #[test]
    fn test_data_query_defaults() {
        let q = query(None, None);
        assert_eq!(q.count(100_000), 1000);
        assert_eq!(q.start_time(5_000_000), 1_400_000);
    }

    #[test]
    fn test_data_query_malformed_falls_back() {
        let q = query(Some("lots"), Some("yesterday"));
        assert_eq!(q.count(100_000), 1000);
        assert_eq!(q.start_time(5_000_000), 1_400_000);

        let q = query(Some("-5"), Some(""));
        assert_eq!(q.count(100_000), 1000);
    }

    #[test]
    fn test_data_query_parses_and_caps() {
        let q = query(Some("25"), Some("12345"));
        assert_eq!(q.count(100_000), 25);
        assert_eq!(q.start_time(0), 12345);

        let q = query(Some("999999999"), None);
        assert_eq!(q.count(100_000), 100_000);
    }

    #[test]
    fn test_chart_query_dimensions() {
        let q = ChartQuery {
            width: Some("640".to_string()),
            height: Some("-1".to_string()),
            ..Default::default()
        };
        assert_eq!(q.width(800.0), 640.0);
        assert_eq!(q.height(400.0), 400.0);
        assert_eq!(q.series_name(), "fps");
    }

    #[test]
    fn test_chart_query_filter_is_lenient() {
        let q = ChartQuery {
            min_value: Some(" 55.5 ".to_string()),
            max_value: Some("high".to_string()),
            category: Some("gpu".to_string()),
            ..Default::default()
        };
        assert_eq!(q.filter(), SampleFilter::new().min_value(55.5).category("gpu"));

        let q = ChartQuery {
            max_value: Some("NaN".to_string()),
            category: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(q.filter().is_empty());
    }
}
