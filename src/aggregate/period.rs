//! Aggregation periods

use serde::{Deserialize, Deserializer, Serialize};

/// Fixed-length time window used to bucket samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationPeriod {
    #[serde(rename = "1min")]
    OneMinute,
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "1hour")]
    OneHour,
}

impl AggregationPeriod {
    /// All periods, shortest first
    pub fn all() -> &'static [AggregationPeriod] {
        &[Self::OneMinute, Self::FiveMinutes, Self::OneHour]
    }

    /// Period length in milliseconds
    pub fn duration_ms(&self) -> i64 {
        match self {
            Self::OneMinute => 60_000,
            Self::FiveMinutes => 300_000,
            Self::OneHour => 3_600_000,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OneMinute => "1min",
            Self::FiveMinutes => "5min",
            Self::OneHour => "1hour",
        }
    }

    /// Parse a period label
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "1min" => Some(Self::OneMinute),
            "5min" => Some(Self::FiveMinutes),
            "1hour" => Some(Self::OneHour),
            _ => None,
        }
    }

    /// Start of the bucket containing `timestamp`.
    ///
    /// Floor division, so negative timestamps land in the bucket below zero.
    pub fn bucket_start(&self, timestamp: i64) -> i64 {
        let length = self.duration_ms();
        timestamp.div_euclid(length) * length
    }
}

impl Default for AggregationPeriod {
    fn default() -> Self {
        Self::OneMinute
    }
}

impl std::fmt::Display for AggregationPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Deserialize a period label, falling back to one minute for anything
/// unrecognised
pub(crate) fn lenient_period<'de, D>(deserializer: D) -> Result<AggregationPeriod, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(label
        .as_deref()
        .and_then(AggregationPeriod::from_label)
        .unwrap_or_default())
}
