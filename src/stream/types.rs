//! Core data types for the telemetry stream
//!
//! - `Sample`: a single (timestamp, value) telemetry point
//! - `SeriesKind`: the three telemetry series the dashboard tracks
//! - `SeriesProfile`: base value, variance and valid range of a series

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A single telemetry measurement
///
/// Immutable once created. Within one stream, samples are ordered by
/// non-decreasing timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// The measured value
    pub value: f64,
    /// Optional category label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Sample {
    /// Create a sample at a specific timestamp
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self {
            timestamp,
            value,
            category: None,
        }
    }

    /// Create a sample stamped with the current time
    pub fn now(value: f64) -> Self {
        Self::new(Utc::now().timestamp_millis(), value)
    }

    /// Builder method: set category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Same sample with a different value
    pub fn with_value(&self, value: f64) -> Self {
        Self {
            timestamp: self.timestamp,
            value,
            category: self.category.clone(),
        }
    }
}

/// The telemetry series served by the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    /// Frames per second
    Fps,
    /// Memory usage (fraction of budget)
    Memory,
    /// Interaction latency in milliseconds
    Latency,
}

impl SeriesKind {
    /// Get all series for iteration
    pub fn all() -> &'static [SeriesKind] {
        &[SeriesKind::Fps, SeriesKind::Memory, SeriesKind::Latency]
    }

    /// Name used in topics, query strings and JSON keys
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesKind::Fps => "fps",
            SeriesKind::Memory => "memory",
            SeriesKind::Latency => "latency",
        }
    }

    /// Parse a series name (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "fps" => Some(SeriesKind::Fps),
            "memory" | "mem" => Some(SeriesKind::Memory),
            "latency" => Some(SeriesKind::Latency),
            _ => None,
        }
    }

    /// Generation profile of this series
    pub fn profile(&self) -> SeriesProfile {
        match self {
            SeriesKind::Fps => SeriesProfile::new(60.0, 3.0).clamp(30.0, 90.0),
            SeriesKind::Memory => SeriesProfile::new(0.6, 0.1).clamp(0.0, f64::INFINITY),
            SeriesKind::Latency => SeriesProfile::new(85.0, 10.0).clamp(50.0, 150.0),
        }
    }
}

impl std::fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shape of a synthetic series: centre, spread and valid range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesProfile {
    /// Value the series oscillates around
    pub base_value: f64,
    /// Peak-to-peak noise amplitude
    pub variance: f64,
    /// Inclusive valid range, if any
    pub range: Option<(f64, f64)>,
}

impl SeriesProfile {
    pub fn new(base_value: f64, variance: f64) -> Self {
        Self {
            base_value,
            variance,
            range: None,
        }
    }

    /// Builder: restrict values to `[min, max]`
    pub fn clamp(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Clamp a value into this profile's range
    pub fn apply_range(&self, value: f64) -> f64 {
        match self.range {
            Some((min, max)) => value.max(min).min(max),
            None => value,
        }
    }
}

/// Round to one decimal place
pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_serialization_omits_missing_category() {
        let sample = Sample::new(1000, 60.5);
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, r#"{"timestamp":1000,"value":60.5}"#);

        let tagged = Sample::new(1000, 60.5).category("gpu");
        let json = serde_json::to_string(&tagged).unwrap();
        assert!(json.contains(r#""category":"gpu""#));
    }

    #[test]
    fn test_sample_deserialize_without_category() {
        let sample: Sample = serde_json::from_str(r#"{"timestamp":5,"value":1.5}"#).unwrap();
        assert_eq!(sample, Sample::new(5, 1.5));
    }

    #[test]
    fn test_series_parse() {
        assert_eq!(SeriesKind::parse("FPS"), Some(SeriesKind::Fps));
        assert_eq!(SeriesKind::parse(" latency "), Some(SeriesKind::Latency));
        assert_eq!(SeriesKind::parse("cpu"), None);
    }

    #[test]
    fn test_profile_clamp() {
        let profile = SeriesKind::Fps.profile();
        assert_eq!(profile.apply_range(120.0), 90.0);
        assert_eq!(profile.apply_range(10.0), 30.0);
        assert_eq!(profile.apply_range(61.0), 61.0);

        let memory = SeriesKind::Memory.profile();
        assert_eq!(memory.apply_range(-0.2), 0.0);
        assert_eq!(memory.apply_range(3.5), 3.5);
    }

    #[test]
    fn test_round_tenth() {
        assert_eq!(round_tenth(60.04), 60.0);
        assert_eq!(round_tenth(60.06), 60.1);
    }
}
