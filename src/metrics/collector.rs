//! Rolling performance log
//!
//! [`MetricsCollector`] is a cheap-to-clone handle on one shared log. Any
//! number of writers may record concurrently; the log keeps only the
//! newest `max_samples` entries.

use chrono::Utc;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use super::error::MetricsResult;
use super::sample::MetricsSample;
use super::stats::PerformanceReport;

/// Default log capacity
pub const DEFAULT_MAX_SAMPLES: usize = 1000;

/// Shared, capacity-capped log of performance samples
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    samples: Arc<Mutex<VecDeque<MetricsSample>>>,
    max_samples: usize,
}

impl MetricsCollector {
    pub fn new(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            samples: Arc::new(Mutex::new(VecDeque::with_capacity(max_samples))),
            max_samples,
        }
    }

    pub fn max_samples(&self) -> usize {
        self.max_samples
    }

    /// Append a sample, evicting the oldest beyond capacity
    pub fn record(&self, sample: MetricsSample) {
        let mut samples = self.lock();
        samples.push_back(sample);
        while samples.len() > self.max_samples {
            samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the log, oldest first
    pub fn snapshot(&self) -> Vec<MetricsSample> {
        self.lock().iter().cloned().collect()
    }

    /// Summary statistics, `None` when the log is empty
    pub fn stats(&self) -> Option<PerformanceReport> {
        PerformanceReport::from_samples(self.lock().iter())
    }

    /// The log as a pretty-printed JSON array
    pub fn export(&self) -> MetricsResult<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Write the export to `dir/performance-metrics-<epoch-millis>.json`
    pub fn export_to_dir(&self, dir: impl AsRef<Path>) -> MetricsResult<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let path = dir.join(export_file_name(Utc::now().timestamp_millis()));
        std::fs::write(&path, self.export()?)?;

        tracing::info!(path = %path.display(), samples = self.len(), "Exported performance metrics");
        Ok(path)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<MetricsSample>> {
        self.samples.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SAMPLES)
    }
}

/// `performance-metrics-<epoch-millis>.json`
pub fn export_file_name(timestamp_ms: i64) -> String {
    format!("performance-metrics-{}.json", timestamp_ms)
}
