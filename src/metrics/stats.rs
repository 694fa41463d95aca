//! Summary statistics over the metrics log

use serde::{Deserialize, Serialize};

use super::sample::{MemoryReading, MetricsSample};

/// Nearest-rank percentile: the value at index `ceil(p/100 · n) - 1` of
/// the sorted values, clamped into range. Zero for no values.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (p / 100.0 * sorted.len() as f64).ceil() as i64 - 1;
    let index = rank.clamp(0, sorted.len() as i64 - 1) as usize;
    sorted[index]
}

/// min/max/mean and upper percentiles of one measurement
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Distribution {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

impl Distribution {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        Self {
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            avg: values.iter().sum::<f64>() / values.len() as f64,
            p50: percentile(values, 50.0),
            p95: percentile(values, 95.0),
            p99: percentile(values, 99.0),
        }
    }
}

/// Statistics over the whole log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub fps: Distribution,
    pub frame_time: Distribution,
    /// Peak memory use and the most recent limit; absent when no sample
    /// carried memory data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryReading>,
    pub sample_count: usize,
}

impl PerformanceReport {
    /// `None` for an empty log
    pub fn from_samples<'a>(samples: impl IntoIterator<Item = &'a MetricsSample>) -> Option<Self> {
        let mut fps = Vec::new();
        let mut frame_time = Vec::new();
        let mut memory: Option<MemoryReading> = None;

        for sample in samples {
            fps.push(sample.fps);
            frame_time.push(sample.frame_time_ms);
            if let Some(reading) = sample.memory_reading() {
                memory = Some(match memory {
                    Some(peak) => MemoryReading {
                        used: peak.used.max(reading.used),
                        limit: reading.limit,
                    },
                    None => reading,
                });
            }
        }

        if fps.is_empty() {
            return None;
        }

        Some(Self {
            fps: Distribution::from_values(&fps),
            frame_time: Distribution::from_values(&frame_time),
            memory,
            sample_count: fps.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_one_to_hundred() {
        let values: Vec<f64> = (1..=100).map(|v| v as f64).collect();
        assert_eq!(percentile(&values, 50.0), 50.0);
        assert_eq!(percentile(&values, 95.0), 95.0);
        assert_eq!(percentile(&values, 99.0), 99.0);
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 100.0), 100.0);
    }

    #[test]
    fn test_percentile_unsorted_and_small() {
        assert_eq!(percentile(&[3.0, 1.0, 2.0], 50.0), 2.0);
        assert_eq!(percentile(&[7.0], 99.0), 7.0);
        assert_eq!(percentile(&[], 95.0), 0.0);
    }

    #[test]
    fn test_report_none_when_empty() {
        assert!(PerformanceReport::from_samples(&Vec::<MetricsSample>::new()).is_none());
    }

    #[test]
    fn test_report_values() {
        let samples: Vec<MetricsSample> = (1..=100)
            .map(|v| MetricsSample::new(v as f64, 1000.0 / v as f64))
            .collect();
        let report = PerformanceReport::from_samples(&samples).unwrap();

        assert_eq!(report.sample_count, 100);
        assert_eq!(report.fps.min, 1.0);
        assert_eq!(report.fps.max, 100.0);
        assert_eq!(report.fps.avg, 50.5);
        assert_eq!(report.fps.p95, 95.0);
        assert_eq!(report.frame_time.max, 1000.0);
        assert!(report.memory.is_none());
    }

    #[test]
    fn test_report_memory_high_water() {
        let samples = vec![
            MetricsSample::new(60.0, 16.0).memory(Some(MemoryReading { used: 300, limit: 1_000 })),
            MetricsSample::new(60.0, 16.0),
            MetricsSample::new(60.0, 16.0).memory(Some(MemoryReading { used: 200, limit: 2_000 })),
        ];
        let report = PerformanceReport::from_samples(&samples).unwrap();
        assert_eq!(report.memory, Some(MemoryReading { used: 300, limit: 2_000 }));
    }

    #[test]
    fn test_report_json_shape() {
        let report = PerformanceReport::from_samples(&[MetricsSample::new(60.0, 16.0)]).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("frameTime").is_some());
        assert_eq!(json["sampleCount"], 1);
        assert!(json.get("memory").is_none());
    }
}
