//! Time-bucket aggregation, normalization and summary statistics
//!
//! All functions here are pure: the same input always produces the same
//! output, and nothing is mutated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::period::AggregationPeriod;
use crate::stream::Sample;

/// Summary of the samples falling into one period-aligned window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateBucket {
    /// Period the bucket was built with
    pub period: AggregationPeriod,
    /// Inclusive start of the window, aligned to the period
    #[serde(rename = "timestamp")]
    pub start_time: i64,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub count: usize,
}

impl AggregateBucket {
    /// Exclusive end of the window
    pub fn end_time(&self) -> i64 {
        self.start_time + self.period.duration_ms()
    }
}

/// Running min/max/sum for one bucket
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    min: f64,
    max: f64,
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn new(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            sum: value,
            count: 1,
        }
    }

    fn add(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
    }
}

/// Group samples into period-aligned buckets, ascending by start time.
///
/// Input order does not matter. Empty input yields no buckets.
pub fn aggregate(samples: &[Sample], period: AggregationPeriod) -> Vec<AggregateBucket> {
    let mut groups: BTreeMap<i64, Accumulator> = BTreeMap::new();

    for sample in samples {
        let start = period.bucket_start(sample.timestamp);
        groups
            .entry(start)
            .and_modify(|acc| acc.add(sample.value))
            .or_insert_with(|| Accumulator::new(sample.value));
    }

    groups
        .into_iter()
        .map(|(start_time, acc)| AggregateBucket {
            period,
            start_time,
            min: acc.min,
            max: acc.max,
            avg: acc.sum / acc.count as f64,
            count: acc.count,
        })
        .collect()
}

/// Rescale values into `[0, 1]` relative to the series' own min and max.
///
/// A constant series maps every value to zero. Timestamps, categories and
/// order are preserved.
pub fn normalize(samples: &[Sample]) -> Vec<Sample> {
    let Some((min, max)) = value_range(samples) else {
        return Vec::new();
    };
    let range = non_zero(max - min);

    samples
        .iter()
        .map(|s| s.with_value((s.value - min) / range))
        .collect()
}

/// Time span and value summary of a series
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStats {
    pub start_time: i64,
    pub end_time: i64,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl SeriesStats {
    /// `max - min`, or 1 for a flat or empty series
    pub fn value_range(&self) -> f64 {
        non_zero(self.max - self.min)
    }

    pub fn is_empty(&self) -> bool {
        self.start_time == 0 && self.end_time == 0 && self.min == 0.0 && self.max == 0.0
    }
}

/// Compute [`SeriesStats`]; all zero for an empty slice.
pub fn calculate_stats(samples: &[Sample]) -> SeriesStats {
    let Some((min, max)) = value_range(samples) else {
        return SeriesStats::default();
    };

    let start_time = samples.iter().map(|s| s.timestamp).min().unwrap_or(0);
    let end_time = samples.iter().map(|s| s.timestamp).max().unwrap_or(0);
    let avg = samples.iter().map(|s| s.value).sum::<f64>() / samples.len() as f64;

    SeriesStats {
        start_time,
        end_time,
        min,
        max,
        avg,
    }
}

fn value_range(samples: &[Sample]) -> Option<(f64, f64)> {
    let first = samples.first()?.value;
    Some(samples.iter().fold((first, first), |(min, max), s| {
        (min.min(s.value), max.max(s.value))
    }))
}

/// Substitute 1 for a zero divisor
pub(crate) fn non_zero(range: f64) -> f64 {
    if range == 0.0 {
        1.0
    } else {
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(timestamp: i64, value: f64) -> Sample {
        Sample::new(timestamp, value)
    }

    #[test]
    fn test_aggregate_two_buckets() {
        let samples = vec![s(0, 10.0), s(30_000, 20.0), s(60_000, 30.0)];
        let buckets = aggregate(&samples, AggregationPeriod::OneMinute);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].start_time, 0);
        assert_eq!(
            (buckets[0].min, buckets[0].max, buckets[0].avg, buckets[0].count),
            (10.0, 20.0, 15.0, 2)
        );
        assert_eq!(buckets[1].start_time, 60_000);
        assert_eq!(
            (buckets[1].min, buckets[1].max, buckets[1].avg, buckets[1].count),
            (30.0, 30.0, 30.0, 1)
        );
        assert_eq!(buckets[1].end_time(), 120_000);
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate(&[], AggregationPeriod::OneHour).is_empty());
    }

    #[test]
    fn test_aggregate_is_deterministic_and_order_independent() {
        let samples: Vec<Sample> = (0..500).map(|i| s(i * 7_919, (i % 13) as f64)).collect();
        let mut shuffled = samples.clone();
        shuffled.reverse();

        let first = aggregate(&samples, AggregationPeriod::FiveMinutes);
        assert_eq!(first, aggregate(&samples, AggregationPeriod::FiveMinutes));
        assert_eq!(first, aggregate(&shuffled, AggregationPeriod::FiveMinutes));

        let total: usize = first.iter().map(|b| b.count).sum();
        assert_eq!(total, samples.len());
        assert!(first.windows(2).all(|w| w[0].start_time < w[1].start_time));
    }

    #[test]
    fn test_aggregate_negative_timestamps() {
        let buckets = aggregate(&[s(-1, 4.0), s(1, 6.0)], AggregationPeriod::OneMinute);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].start_time, -60_000);
        assert_eq!(buckets[1].start_time, 0);
    }

    #[test]
    fn test_bucket_wire_format() {
        let bucket = aggregate(&[s(61_000, 2.0)], AggregationPeriod::OneMinute).remove(0);
        let json = serde_json::to_value(&bucket).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "period": "1min",
                "timestamp": 60000,
                "min": 2.0,
                "max": 2.0,
                "avg": 2.0,
                "count": 1
            })
        );
    }

    #[test]
    fn test_normalize_bounds_and_order() {
        let samples = vec![s(0, 5.0), s(1, 15.0), s(2, 10.0)];
        let normalized = normalize(&samples);

        let values: Vec<f64> = normalized.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![0.0, 1.0, 0.5]);
        let timestamps: Vec<i64> = normalized.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![0, 1, 2]);
    }

    #[test]
    fn test_normalize_constant_series() {
        let normalized = normalize(&[s(0, 7.0), s(1, 7.0)]);
        assert!(normalized.iter().all(|s| s.value == 0.0));
    }

    #[test]
    fn test_normalize_keeps_category() {
        let normalized = normalize(&[s(0, 1.0).category("gpu"), s(1, 2.0)]);
        assert_eq!(normalized[0].category.as_deref(), Some("gpu"));
    }

    #[test]
    fn test_calculate_stats() {
        let stats = calculate_stats(&[s(100, 2.0), s(300, 6.0), s(200, 4.0)]);
        assert_eq!(stats.start_time, 100);
        assert_eq!(stats.end_time, 300);
        assert_eq!((stats.min, stats.max, stats.avg), (2.0, 6.0, 4.0));
        assert_eq!(stats.value_range(), 4.0);
    }

    #[test]
    fn test_calculate_stats_empty() {
        let stats = calculate_stats(&[]);
        assert_eq!(stats, SeriesStats::default());
        assert!(stats.is_empty());
        assert_eq!(stats.value_range(), 1.0);
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let json = serde_json::to_string(&calculate_stats(&[s(1, 1.0)])).unwrap();
        assert!(json.contains("\"startTime\":1"));
        assert!(json.contains("\"endTime\":1"));
    }
}
